use crate::domain_event::Payload;
use crate::error::DomainResult;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbox 行
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// 追加时生成的唯一标识
    #[builder(default = Uuid::new_v4())]
    id: Uuid,
    /// 事件类型标签，处理时据此路由到作业名
    #[builder(into)]
    event_type: String,
    /// 序列化后的有序载荷
    #[builder(into)]
    event_data: String,
    /// 是否已完成交接
    #[builder(default)]
    processed: bool,
    /// 追加时间，决定处理顺序
    #[builder(default = Utc::now())]
    created_at: DateTime<Utc>,
    /// 完成交接的时间，只设置一次
    processed_at: Option<DateTime<Utc>>,
    /// 当前认领者
    reserved_by: Option<String>,
    /// 认领租约到期时间，过期后其他处理器可重新认领
    reserved_until: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    /// 以事件类型与载荷构造一条未处理的行
    pub fn pending(event_type: &str, payload: &Payload) -> DomainResult<Self> {
        Ok(Self::builder()
            .event_type(event_type)
            .event_data(serde_json::to_string(payload)?)
            .build())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_data(&self) -> &str {
        &self.event_data
    }

    pub fn processed(&self) -> bool {
        self.processed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn reserved_by(&self) -> Option<&str> {
        self.reserved_by.as_deref()
    }

    pub fn reserved_until(&self) -> Option<DateTime<Utc>> {
        self.reserved_until
    }

    /// 反序列化载荷
    pub fn payload(&self) -> DomainResult<Payload> {
        Ok(serde_json::from_str(&self.event_data)?)
    }

    /// 未处理且没有有效租约
    pub fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        !self.processed && self.reserved_until.is_none_or(|until| until <= now)
    }

    pub(crate) fn claim(&mut self, claimant: &str, until: DateTime<Utc>) {
        self.reserved_by = Some(claimant.to_string());
        self.reserved_until = Some(until);
    }

    /// 条件标记：已处理时不产生任何变化并返回 `false`
    pub(crate) fn mark_processed(&mut self, at: DateTime<Utc>) -> bool {
        if self.processed {
            return false;
        }
        self.processed = true;
        self.processed_at = Some(at);
        self.release();
        true
    }

    pub(crate) fn release(&mut self) {
        self.reserved_by = None;
        self.reserved_until = None;
    }
}

/// Outbox 积压统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxStats {
    pub total: u64,
    pub pending: u64,
    pub processed: u64,
}
