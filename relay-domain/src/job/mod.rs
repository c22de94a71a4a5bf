//! 作业存储（job）
//!
//! 位于独立数据源中的待执行作业，由进程外 worker 消费。
//! 本模块只约定写入形态：`{id, queue, payload: {job, data}, attempts: 0,
//! reserved_at: null, available_at: now, created_at: now}`；
//! 消费、调度与重试属于 worker，不在此定义。
//!
mod memory;
#[cfg(feature = "infra-sqlx")]
mod postgres;
mod record;
mod store;

pub use memory::InMemoryJobStore;
#[cfg(feature = "infra-sqlx")]
pub use postgres::PgJobStore;
pub use record::{DEFAULT_QUEUE, JobPayload, JobRecord};
pub use store::JobStore;
