//! 应用层（relay-application）
//!
//! 把“保存聚合 → 释放事件 → 分发 + 追加 Outbox”固定为一条代码路径：
//! - `EventRelay`：逐个事件先同步分发，再追加到 Outbox；
//! - `RelayingRepository`：包装持久化仓储，`save` 成功后立即释放并中继事件。
//!
pub mod error;
pub mod event_relay;
pub mod inmemory_aggregate_store;
pub mod repository;

pub use event_relay::EventRelay;
pub use inmemory_aggregate_store::InMemoryAggregateStore;
pub use repository::{AggregateStore, RelayingRepository};
