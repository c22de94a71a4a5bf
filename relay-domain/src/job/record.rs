use crate::domain_event::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 默认（单一）作业通道
pub const DEFAULT_QUEUE: &str = "default";

/// 作业载荷：作业名 + 原始事件载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub job: String,
    pub data: Payload,
}

/// 作业记录（仅由 Outbox 处理器写入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    id: Uuid,
    queue: String,
    payload: JobPayload,
    /// 由消费方维护，中继只写入 0
    attempts: u32,
    /// 由消费方维护，中继只写入空
    reserved_at: Option<DateTime<Utc>>,
    available_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl JobRecord {
    /// 构造一条立即可执行的作业
    pub fn queued(
        queue: impl Into<String>,
        job: impl Into<String>,
        data: Payload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue: queue.into(),
            payload: JobPayload {
                job: job.into(),
                data,
            },
            attempts: 0,
            reserved_at: None,
            available_at: now,
            created_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn payload(&self) -> &JobPayload {
        &self.payload
    }

    pub fn job_name(&self) -> &str {
        &self.payload.job
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reserved_at(&self) -> Option<DateTime<Utc>> {
        self.reserved_at
    }

    pub fn available_at(&self) -> DateTime<Utc> {
        self.available_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
