//! 事件子系统（eventing）
//!
//! 进程内同步分发：
//! - `EventListener`：对某类/多类事件执行副作用的监听器；
//! - `EventDispatcher`：按事件类型维护有序监听器列表，逐个调用并隔离失败。
//!
//! 分发只存在于内存中，没有持久性也不跨进程可见，持久补充由 `outbox` 提供。
//!
pub mod dispatcher;
pub mod listener;

pub use dispatcher::{DispatchReport, EventDispatcher};
pub use listener::{EventListener, FnListener, HandledEventType};
