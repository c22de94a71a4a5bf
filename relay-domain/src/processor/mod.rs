//! Outbox 处理器（processor）
//!
//! - `JobRouter`：事件类型 → 作业名的可注入路由表；
//! - `OutboxProcessor`：一次 drain 认领一批未处理行，写入作业存储并标记已处理；
//! - `DrainScheduler`（`scheduler` 特性）：按固定间隔串行执行 drain 的长驻任务。
//!
mod outbox_processor;
mod router;
#[cfg(feature = "scheduler")]
mod scheduler;

pub use outbox_processor::{DrainReport, OutboxProcessor, ProcessorConfig};
pub use router::JobRouter;
#[cfg(feature = "scheduler")]
pub use scheduler::{DrainScheduler, SchedulerConfig, SchedulerHandle};
