//! 事件分发器（EventDispatcher）
//!
//! 进程内的“事件类型 → 有序监听器列表”注册表：
//! - `add_listener` 按注册顺序追加；
//! - `dispatch` 仅调用与事件类型精确匹配的监听器，逐个 await；
//! - 单个监听器返回错误或 panic 时记录日志并继续下一个，`dispatch` 自身不会失败；
//! - 无取消与超时，慢监听器会阻塞调用方。
//!
use super::listener::{EventListener, FnListener};
use crate::domain_event::DomainEvent;
use dashmap::DashMap;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 单次分发的结果统计（仅用于观测）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// 被调用的监听器数量
    pub invoked: usize,
    /// 失败（返回错误或 panic）的监听器名称，按调用顺序
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failed.len()
    }
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: DashMap<String, Vec<Arc<dyn EventListener>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为事件类型注册监听器，保持注册顺序
    pub fn add_listener(&self, event_type: impl Into<String>, listener: Arc<dyn EventListener>) {
        self.listeners
            .entry(event_type.into())
            .or_default()
            .push(listener);
    }

    /// 以闭包注册监听器
    pub fn add_fn<F>(&self, event_type: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&dyn DomainEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_listener(event_type, Arc::new(FnListener::new(name, f)));
    }

    /// 按监听器声明的 `handled_event_type` 注册到每个类型
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
        let types = listener.handled_event_type().into_vec();
        if types.is_empty() {
            warn!(
                listener = listener.listener_name(),
                "listener declares no event types; nothing subscribed"
            );
        }
        for event_type in types {
            self.add_listener(event_type, listener.clone());
        }
    }

    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|list| !list.is_empty())
    }

    /// 返回注册列表的快照（不持有内部锁）
    pub fn get_listeners(&self, event_type: &str) -> Vec<Arc<dyn EventListener>> {
        self.listeners
            .get(event_type)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// 将事件依次交给所有匹配的监听器
    pub async fn dispatch(&self, event: &dyn DomainEvent) -> DispatchReport {
        let event_type = event.event_type();
        let listeners = self.get_listeners(event_type);
        let mut report = DispatchReport::default();

        if listeners.is_empty() {
            debug!(event_type, "no listeners registered");
            return report;
        }

        for listener in listeners {
            report.invoked += 1;
            let name = listener.listener_name();

            match AssertUnwindSafe(listener.handle(event)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(event_type, listener = name, error = %err, "event listener failed");
                    report.failed.push(name.to_string());
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    error!(event_type, listener = name, reason, "event listener panicked");
                    report.failed.push(name.to_string());
                }
            }
        }

        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
