//! 事件监听器（EventListener）
//!
//! 定义进程内消费事件的处理逻辑与元信息（名称、订阅类型），
//! 并提供将普通闭包包装为监听器的 `FnListener`。
//!
use crate::domain_event::DomainEvent;
use async_trait::async_trait;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandledEventType {
    One(String),
    Many(Vec<String>),
}

impl HandledEventType {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            HandledEventType::One(t) => vec![t],
            HandledEventType::Many(ts) => ts,
        }
    }
}

/// 事件监听器：同步（按注册顺序逐个 await）处理事件
#[async_trait]
pub trait EventListener: Send + Sync {
    /// 监听器名称（用于日志与失败报告）
    fn listener_name(&self) -> &str;

    /// 该监听器订阅的事件类型，仅 `EventDispatcher::subscribe` 使用
    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::Many(Vec::new())
    }

    /// 处理事件
    async fn handle(&self, event: &dyn DomainEvent) -> anyhow::Result<()>;
}

type ListenerFn = Box<dyn Fn(&dyn DomainEvent) -> anyhow::Result<()> + Send + Sync>;

/// 闭包监听器
pub struct FnListener {
    name: String,
    f: ListenerFn,
}

impl FnListener {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn DomainEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl fmt::Debug for FnListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").field("name", &self.name).finish()
    }
}

#[async_trait]
impl EventListener for FnListener {
    fn listener_name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &dyn DomainEvent) -> anyhow::Result<()> {
        (self.f)(event)
    }
}
