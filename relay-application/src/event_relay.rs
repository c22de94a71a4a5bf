//! 事件中继（EventRelay）
//!
//! 对每个释放出的事件依次执行：
//! 1. `dispatch`：同步调用进程内监听器，失败已在分发器内隔离；
//! 2. `append`：写入 Outbox，失败直接返回给调用方。
//!
//! 某个事件追加失败时后续事件不再处理；它们已从聚合中释放，由调用方决定如何补偿。
//!
use crate::error::AppError;
use relay_domain::domain_event::SharedEvent;
use relay_domain::eventing::EventDispatcher;
use relay_domain::outbox::OutboxStore;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct EventRelay {
    dispatcher: Arc<EventDispatcher>,
    outbox: Arc<dyn OutboxStore>,
}

impl EventRelay {
    pub fn new(dispatcher: Arc<EventDispatcher>, outbox: Arc<dyn OutboxStore>) -> Self {
        Self { dispatcher, outbox }
    }

    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    pub fn outbox(&self) -> &Arc<dyn OutboxStore> {
        &self.outbox
    }

    /// 分发并追加，返回 Outbox 行 ID（与事件顺序一致）
    pub async fn relay(&self, events: Vec<SharedEvent>) -> Result<Vec<Uuid>, AppError> {
        let mut ids = Vec::with_capacity(events.len());

        for event in events {
            let report = self.dispatcher.dispatch(event.as_ref()).await;
            let id = self
                .outbox
                .append(event.event_type(), &event.payload())
                .await?;

            debug!(
                event_type = event.event_type(),
                outbox_id = %id,
                listeners = report.invoked,
                failed = report.failed.len(),
                "event relayed"
            );
            ids.push(id);
        }

        Ok(ids)
    }
}
