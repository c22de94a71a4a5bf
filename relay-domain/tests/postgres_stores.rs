//! 需要可用的 Postgres：设置 `DATABASE_URL` 后运行
//! `cargo test -p relay-domain --features infra-sqlx --test postgres_stores`
use anyhow::Result as AnyResult;
use chrono::Utc;
use relay_domain::error::DomainError;
use relay_domain::job::{JobRecord, JobStore, PgJobStore};
use relay_domain::outbox::{OutboxStore, PgOutboxStore};
use relay_domain::payload;
use sqlx::PgPool;
use sqlx::types::Json;
use std::time::Duration;
use uuid::Uuid;

async fn pool() -> AnyResult<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    };
    Ok(Some(PgPool::connect(&url).await?))
}

#[tokio::test]
async fn outbox_claim_mark_release_roundtrip() -> AnyResult<()> {
    let Some(pool) = pool().await? else {
        return Ok(());
    };
    let store = PgOutboxStore::new(pool);
    let claimant = format!("test-{}", Uuid::new_v4());

    let id = store
        .append("ArticlePublished", &payload! { "article_id" => "pg-a1", "title" => "T" })
        .await?;
    let entry = store.get(id).await?.expect("appended row");
    assert!(!entry.processed());
    assert_eq!(entry.payload()?["article_id"], "pg-a1");

    let claimed = store
        .claim_pending(&claimant, 10_000, Duration::from_secs(60))
        .await?;
    let mine = claimed.iter().find(|e| e.id() == id).expect("row claimed");
    assert_eq!(mine.reserved_by(), Some(claimant.as_str()));

    // 租约未过期时其他认领者拿不到
    let other = store
        .claim_pending("someone-else", 10_000, Duration::from_secs(60))
        .await?;
    assert!(other.iter().all(|e| e.id() != id));

    assert!(!store.release(id, "someone-else").await?);
    assert!(store.release(id, &claimant).await?);
    assert!(store.get(id).await?.unwrap().reserved_by().is_none());

    let at = Utc::now();
    assert!(store.mark_processed(id, at).await?);
    assert!(!store.mark_processed(id, Utc::now()).await?);
    let done = store.get(id).await?.unwrap();
    assert!(done.processed());
    let stored = done.processed_at().unwrap();
    assert!((stored - at).num_milliseconds().abs() < 1);

    // 其余行交还，避免影响其他测试
    for e in claimed.iter().filter(|e| e.id() != id) {
        store.release(e.id(), &claimant).await?;
    }
    Ok(())
}

#[tokio::test]
async fn append_in_rolls_back_with_the_caller() -> AnyResult<()> {
    let Some(pool) = pool().await? else {
        return Ok(());
    };
    let store = PgOutboxStore::new(pool.clone());
    store.ensure_schema().await?;

    let mut tx = pool.begin().await?;
    let id = store
        .append_in(&mut tx, "ArticleDeleted", &payload! { "article_id" => "pg-a2" })
        .await?;
    tx.rollback().await?;
    assert!(store.get(id).await?.is_none());

    let mut tx = pool.begin().await?;
    let id = store
        .append_in(&mut tx, "ArticleDeleted", &payload! { "article_id" => "pg-a3" })
        .await?;
    tx.commit().await?;
    assert!(store.get(id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn job_push_writes_the_contract_shape() -> AnyResult<()> {
    let Some(pool) = pool().await? else {
        return Ok(());
    };
    let store = PgJobStore::new(pool.clone());
    let job = JobRecord::queued(
        "default",
        "reindex-article",
        payload! { "article_id" => "pg-a1" },
        Utc::now(),
    );
    store.push(&job).await?;

    let (queue, payload, attempts, reserved): (String, Json<serde_json::Value>, i32, Option<chrono::DateTime<Utc>>) =
        sqlx::query_as("SELECT queue, payload, attempts, reserved_at FROM jobs WHERE id = $1")
            .bind(job.id())
            .fetch_one(&pool)
            .await?;
    assert_eq!(queue, "default");
    assert_eq!(payload.0["job"], "reindex-article");
    assert_eq!(payload.0["data"]["article_id"], "pg-a1");
    assert_eq!(attempts, 0);
    assert!(reserved.is_none());
    Ok(())
}

#[tokio::test]
async fn oversized_claim_limit_is_rejected() -> AnyResult<()> {
    // 延迟连接：校验发生在访问数据库之前
    let pool = PgPool::connect_lazy("postgres://relay@127.0.0.1:1/unused")?;
    let store = PgOutboxStore::new(pool);

    let err = store
        .claim_pending("w1", usize::MAX, Duration::from_secs(60))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidValue { .. }));
    Ok(())
}
