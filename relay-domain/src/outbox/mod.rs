//! 事务性 Outbox（outbox）
//!
//! 与聚合主数据同库的追加式表，每个需要转为下游作业的事件对应一行：
//! - `OutboxEntry`：行模型，`processed` 只会从 `false` 变为 `true` 一次；
//! - `OutboxStore`：追加、认领、标记已处理与统计的存储协议；
//! - `InMemoryOutboxStore`：测试与本地运行用的内存实现；
//! - `PgOutboxStore`（`infra-sqlx`）：Postgres 实现，首次使用时幂等建表。
//!
//! 表结构：`outbox(id, event_type, event_data, processed, created_at, processed_at,
//! reserved_by, reserved_until)`，索引 `(processed, created_at)`。
//!
mod entry;
mod memory;
#[cfg(feature = "infra-sqlx")]
mod postgres;
mod store;

pub use entry::{OutboxEntry, OutboxStats};
pub use memory::InMemoryOutboxStore;
#[cfg(feature = "infra-sqlx")]
pub use postgres::PgOutboxStore;
pub use store::OutboxStore;
