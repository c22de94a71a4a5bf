use std::sync::Arc;

use super::domain_event_trait::{DomainEvent, SharedEvent};

/// 聚合私有的事件缓冲
///
/// - 仅由聚合自身的变更方法在校验通过后追加；
/// - `release` 取走全部事件并清空缓冲（一次性释放），再次调用返回空；
/// - 聚合被丢弃时不会隐式刷出，未释放的事件随之丢失。
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pending: Vec<SharedEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个已完整填充的事件
    pub fn record<E>(&mut self, event: E)
    where
        E: DomainEvent + 'static,
    {
        self.pending.push(Arc::new(event));
    }

    /// 取走缓冲中的全部事件并清空
    pub fn release(&mut self) -> Vec<SharedEvent> {
        std::mem::take(&mut self.pending)
    }

    /// 查看待释放事件（不消费）
    pub fn pending(&self) -> &[SharedEvent] {
        &self.pending
    }

    /// 丢弃待释放事件
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
