use super::entry::{OutboxEntry, OutboxStats};
use crate::domain_event::Payload;
use crate::error::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Outbox 存储协议
///
/// 追加不做去重：调用方保证每个已释放事件最多追加一次。
/// 追加失败不在此吞掉，由调用方决定是否视为致命（推荐视为致命）。
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// 幂等建表（含 `(processed, created_at)` 索引）；各操作在首次使用时也会隐式调用
    async fn ensure_schema(&self) -> DomainResult<()>;

    /// 追加一条 `processed = false` 的行，返回新行标识
    async fn append(&self, event_type: &str, payload: &Payload) -> DomainResult<Uuid>;

    /// 按 `created_at` 升序认领至多 `limit` 条未处理且未被有效租约占用的行
    ///
    /// 认领是原子的：并发调用不会拿到同一行。
    async fn claim_pending(
        &self,
        claimant: &str,
        limit: usize,
        lease: Duration,
    ) -> DomainResult<Vec<OutboxEntry>>;

    /// 标记为已处理；行已处理时不做任何修改并返回 `false`
    async fn mark_processed(&self, id: Uuid, processed_at: DateTime<Utc>) -> DomainResult<bool>;

    /// 释放认领（交接失败后），使该行在下一次处理时立即可被认领
    ///
    /// 仅当该行仍由 `claimant` 持有时生效：租约过期后被他人重新认领的行保持不变。
    /// 返回是否确实释放。
    async fn release(&self, id: Uuid, claimant: &str) -> DomainResult<bool>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<OutboxEntry>>;

    async fn stats(&self) -> DomainResult<OutboxStats>;
}

pub(crate) fn lease_deadline(now: DateTime<Utc>, lease: Duration) -> DomainResult<DateTime<Utc>> {
    let lease = chrono::Duration::from_std(lease).map_err(|e| {
        crate::error::DomainError::invalid_value(format!("claim lease out of range: {e}"))
    })?;
    Ok(now + lease)
}
