//! 内存版 Outbox（InMemoryOutboxStore）
//!
//! 以互斥锁保护的行列表实现 `OutboxStore`，认领在同一把锁内完成，
//! 因而并发处理器之间同样不会重复认领。典型用途：测试、示例与本地开发。
//!
use super::entry::{OutboxEntry, OutboxStats};
use super::store::{OutboxStore, lease_deadline};
use crate::domain_event::Payload;
use crate::error::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryOutboxStore {
    entries: Arc<Mutex<Vec<OutboxEntry>>>,
}

impl InMemoryOutboxStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入一条现成的行（例如指定 `created_at` 或构造损坏的载荷）
    pub async fn insert(&self, entry: OutboxEntry) {
        self.entries.lock().await.push(entry);
    }

    /// 全部行的快照，按追加顺序
    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl OutboxStore for InMemoryOutboxStore {
    async fn ensure_schema(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn append(&self, event_type: &str, payload: &Payload) -> DomainResult<Uuid> {
        let entry = OutboxEntry::pending(event_type, payload)?;
        let id = entry.id();
        self.entries.lock().await.push(entry);
        Ok(id)
    }

    async fn claim_pending(
        &self,
        claimant: &str,
        limit: usize,
        lease: Duration,
    ) -> DomainResult<Vec<OutboxEntry>> {
        let now = Utc::now();
        let until = lease_deadline(now, lease)?;
        let mut entries = self.entries.lock().await;

        // 稳定排序：created_at 相同时保持追加顺序
        let mut candidates: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].is_claimable(now))
            .collect();
        candidates.sort_by_key(|&i| entries[i].created_at());
        candidates.truncate(limit);

        Ok(candidates
            .into_iter()
            .map(|i| {
                entries[i].claim(claimant, until);
                entries[i].clone()
            })
            .collect())
    }

    async fn mark_processed(&self, id: Uuid, processed_at: DateTime<Utc>) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        Ok(entries
            .iter_mut()
            .find(|e| e.id() == id)
            .is_some_and(|e| e.mark_processed(processed_at)))
    }

    async fn release(&self, id: Uuid, claimant: &str) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        match entries
            .iter_mut()
            .find(|e| e.id() == id && !e.processed() && e.reserved_by() == Some(claimant))
        {
            Some(entry) => {
                entry.release();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<OutboxEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.id() == id).cloned())
    }

    async fn stats(&self) -> DomainResult<OutboxStats> {
        let entries = self.entries.lock().await;
        let total = entries.len() as u64;
        let processed = entries.iter().filter(|e| e.processed()).count() as u64;
        Ok(OutboxStats {
            total,
            pending: total - processed,
            processed,
        })
    }
}
