use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_application::error::AppError;
use relay_application::{AggregateStore, EventRelay, InMemoryAggregateStore, RelayingRepository};
use relay_domain::aggregate::Aggregate;
use relay_domain::content::{Article, ArticleStatus};
use relay_domain::domain_event::Payload;
use relay_domain::error::{DomainError, DomainResult};
use relay_domain::eventing::EventDispatcher;
use relay_domain::job::InMemoryJobStore;
use relay_domain::outbox::{InMemoryOutboxStore, OutboxEntry, OutboxStats, OutboxStore};
use relay_domain::processor::OutboxProcessor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

fn relay_with(outbox: Arc<dyn OutboxStore>) -> (Arc<EventDispatcher>, EventRelay) {
    let dispatcher = Arc::new(EventDispatcher::new());
    let relay = EventRelay::new(dispatcher.clone(), outbox);
    (dispatcher, relay)
}

/// 持久化总是失败的存储
struct DownStore;

#[async_trait]
impl AggregateStore<Article> for DownStore {
    async fn load(&self, _id: &String) -> Result<Option<Article>, AppError> {
        Ok(None)
    }

    async fn persist(&self, _aggregate: &Article) -> Result<(), AppError> {
        Err(AppError::Persistence("database is down".into()))
    }
}

/// 追加总是失败的 Outbox
struct ReadOnlyOutbox;

#[async_trait]
impl OutboxStore for ReadOnlyOutbox {
    async fn ensure_schema(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn append(&self, _event_type: &str, _payload: &Payload) -> DomainResult<Uuid> {
        Err(DomainError::outbox_store("read-only transaction"))
    }

    async fn claim_pending(
        &self,
        _claimant: &str,
        _limit: usize,
        _lease: Duration,
    ) -> DomainResult<Vec<OutboxEntry>> {
        Ok(Vec::new())
    }

    async fn mark_processed(&self, _id: Uuid, _at: DateTime<Utc>) -> DomainResult<bool> {
        Ok(false)
    }

    async fn release(&self, _id: Uuid, _claimant: &str) -> DomainResult<bool> {
        Ok(false)
    }

    async fn get(&self, _id: Uuid) -> DomainResult<Option<OutboxEntry>> {
        Ok(None)
    }

    async fn stats(&self) -> DomainResult<OutboxStats> {
        Ok(OutboxStats::default())
    }
}

#[tokio::test]
async fn save_persists_then_releases_and_relays() -> AnyResult<()> {
    let outbox = InMemoryOutboxStore::new();
    let (dispatcher, relay) = relay_with(Arc::new(outbox.clone()));
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let s = seen.clone();
    dispatcher.add_fn("ArticleCreated", "welcome-author", move |e| {
        s.lock().unwrap().push(e.payload()["article_id"].to_string());
        Ok(())
    });

    let store = Arc::new(InMemoryAggregateStore::<Article>::new());
    let repo = RelayingRepository::new(store.clone(), relay);

    let mut article = Article::create("a1", "First post", "body", "u1")?;
    let ids = repo.save(&mut article).await?;

    assert_eq!(ids.len(), 1);
    assert!(article.pending_events().is_empty());
    assert_eq!(*seen.lock().unwrap(), vec!["\"a1\"".to_string()]);

    let row = outbox.get(ids[0]).await?.unwrap();
    assert_eq!(row.event_type(), "ArticleCreated");
    assert!(!row.processed());

    // 重新加载的聚合不携带已释放的事件
    let mut loaded = repo.get(&"a1".to_string()).await?;
    assert!(loaded.pending_events().is_empty());
    loaded.publish()?;
    repo.save(&mut loaded).await?;

    let reloaded = repo.get(&"a1".to_string()).await?;
    assert_eq!(reloaded.status(), ArticleStatus::Published);
    assert_eq!(outbox.stats().await?.pending, 2);
    assert_eq!(store.len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_persist_keeps_events_buffered() -> AnyResult<()> {
    let outbox = InMemoryOutboxStore::new();
    let (dispatcher, relay) = relay_with(Arc::new(outbox.clone()));
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    dispatcher.add_fn("ArticleCreated", "counter", move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let repo = RelayingRepository::new(DownStore, relay);
    let mut article = Article::create("a1", "First post", "body", "u1")?;

    let err = repo.save(&mut article).await.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));
    assert_eq!(article.pending_events().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(outbox.stats().await?.total, 0);
    Ok(())
}

#[tokio::test]
async fn append_failure_propagates_after_dispatch() -> AnyResult<()> {
    let (dispatcher, relay) = relay_with(Arc::new(ReadOnlyOutbox));
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    dispatcher.add_fn("ArticleCreated", "counter", move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let repo = RelayingRepository::new(InMemoryAggregateStore::<Article>::new(), relay);
    let mut article = Article::create("a1", "First post", "body", "u1")?;

    let err = repo.save(&mut article).await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::OutboxStore { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn failing_listener_does_not_block_the_outbox() -> AnyResult<()> {
    let outbox = InMemoryOutboxStore::new();
    let (dispatcher, relay) = relay_with(Arc::new(outbox.clone()));
    dispatcher.add_fn("ArticleCreated", "mailer", |_| {
        Err(anyhow::anyhow!("smtp unavailable"))
    });

    let mut article = Article::create("a1", "First post", "body", "u1")?;
    let ids = relay.relay(article.release_events()).await?;

    assert_eq!(ids.len(), 1);
    assert_eq!(outbox.stats().await?.pending, 1);
    Ok(())
}

#[tokio::test]
async fn missing_aggregate_is_reported() {
    let (_, relay) = relay_with(Arc::new(InMemoryOutboxStore::new()));
    let repo = RelayingRepository::new(InMemoryAggregateStore::<Article>::new(), relay);

    let err = repo.get(&"nope".to_string()).await.unwrap_err();
    assert!(matches!(err, AppError::AggregateNotFound(ref id) if id == "article:nope"));
}

#[tokio::test]
async fn saved_events_reach_the_job_store() -> AnyResult<()> {
    let outbox = InMemoryOutboxStore::new();
    let jobs = InMemoryJobStore::new();
    let (_, relay) = relay_with(Arc::new(outbox.clone()));
    let repo = RelayingRepository::new(InMemoryAggregateStore::<Article>::new(), relay);

    let mut article = Article::create("a1", "First post", "body", "u1")?;
    article.publish()?;
    repo.save(&mut article).await?;

    let processor = OutboxProcessor::new(Arc::new(outbox.clone()), Arc::new(jobs.clone()));
    assert_eq!(processor.process().await?, 2);
    let names: Vec<String> = jobs
        .jobs()
        .await
        .iter()
        .map(|j| j.job_name().to_string())
        .collect();
    assert_eq!(names, vec!["send-article-notification", "reindex-article"]);
    Ok(())
}
