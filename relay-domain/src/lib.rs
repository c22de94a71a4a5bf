//! 领域事件中继基础库（relay-domain）
//!
//! 提供将聚合上的状态变更转换为进程内副作用与持久化作业的通用构件：
//! - 领域事件（`domain_event`）与聚合事件缓冲（`aggregate`）
//! - 进程内同步分发（`eventing`）：监听器注册与失败隔离
//! - 事务性 Outbox（`outbox`）：与主数据同库的追加式事件记录
//! - 作业存储（`job`）：独立数据源中的待执行作业写入契约
//! - Outbox 处理器（`processor`）：认领、路由、写入作业并标记已处理
//! - 内容领域（`content`）：文章、页面、表单、媒体与用户聚合产生的事件
//!
//! 本 crate 的存储均以 trait 形式注入，内存实现用于测试与本地运行，
//! Postgres 实现位于 `infra-sqlx` 特性之后。
//!
//! 典型用法：
//! 1. 聚合在业务方法的最后一步通过 `EventRecorder` 记录事件；
//! 2. 应用服务保存聚合后调用 `release_events`，逐个分发并追加到 Outbox；
//! 3. 外部调度周期性调用 `OutboxProcessor::process` 将 Outbox 转为作业。
//!
pub mod aggregate;
pub mod content;
pub mod domain_event;
pub mod error;
pub mod eventing;
pub mod job;
pub mod outbox;
pub mod processor;

// 供 `payload!` 宏在下游 crate 中解析 serde_json 路径
#[doc(hidden)]
pub use serde_json as __serde_json;
