use chrono::{DateTime, Utc};

use super::domain_event_trait::{DomainEvent, Payload};

/// 以字符串标签与现成载荷表达的事件
///
/// 适用于类型在编译期未知的场景，例如从外部输入重放或测试中构造任意类型。
#[derive(Debug, Clone, PartialEq)]
pub struct GenericEvent {
    event_type: String,
    payload: Payload,
    occurred_at: DateTime<Utc>,
}

impl GenericEvent {
    pub fn new(event_type: impl Into<String>, payload: Payload) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for GenericEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn payload(&self) -> Payload {
        self.payload.clone()
    }
}
