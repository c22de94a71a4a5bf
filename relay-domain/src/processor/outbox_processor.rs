//! Outbox 处理器（OutboxProcessor）
//!
//! 一次 `process` 即一次 drain：
//! 1. 按 `created_at` 升序认领至多 `batch_size` 条未处理行；
//! 2. 逐行反序列化载荷，按路由表解析作业名，命中则写入作业存储；
//! 3. 标记该行已处理（未命中路由的行同样标记，不产生作业）。
//!
//! 单行失败只记录日志并释放认领，该行保持未处理，下一次 drain 重试；
//! 不计次数、不退避、无死信。写入作业与标记之间崩溃会在下次 drain 产生重复作业，
//! 因此投递语义为“至少一次”，下游作业需幂等。
//!
use super::router::JobRouter;
use crate::error::DomainResult;
use crate::job::{DEFAULT_QUEUE, JobRecord, JobStore};
use crate::outbox::{OutboxEntry, OutboxStats, OutboxStore};
use bon::Builder;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 处理器配置
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    /// 单次 drain 的最大行数
    pub batch_size: usize,
    /// 认领者标识（写入 `reserved_by`）
    pub claimant: String,
    /// 认领租约；处理器崩溃后租约到期，行可被重新认领
    pub lease: Duration,
    /// 作业写入的通道
    pub queue: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            claimant: format!("relay-{}", std::process::id()),
            lease: Duration::from_secs(60),
            queue: DEFAULT_QUEUE.to_string(),
        }
    }
}

/// 单次 drain 的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// 认领到的行数
    pub claimed: usize,
    /// 成功标记为已处理的行数
    pub processed: usize,
    /// 写入作业存储的作业数
    pub jobs_queued: usize,
    /// 未命中路由、直接标记的行数
    pub skipped: usize,
    /// 交接失败、保持未处理的行
    pub failed: Vec<Uuid>,
}

enum Handoff {
    Queued,
    Skipped,
    AlreadyProcessed,
}

#[derive(Builder)]
pub struct OutboxProcessor {
    outbox: Arc<dyn OutboxStore>,
    jobs: Arc<dyn JobStore>,
    #[builder(default = JobRouter::cms_defaults())]
    router: JobRouter,
    #[builder(default)]
    config: ProcessorConfig,
}

impl OutboxProcessor {
    /// 使用默认路由与配置创建
    pub fn new(outbox: Arc<dyn OutboxStore>, jobs: Arc<dyn JobStore>) -> Self {
        Self::builder().outbox(outbox).jobs(jobs).build()
    }

    pub fn router(&self) -> &JobRouter {
        &self.router
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// 执行一次 drain，返回本次标记为已处理的行数
    pub async fn process(&self) -> DomainResult<usize> {
        Ok(self.process_detailed().await?.processed)
    }

    /// 执行一次 drain 并返回明细
    ///
    /// 只有认领本身失败（存储不可用）才返回错误；单行失败体现在 `failed` 中。
    pub async fn process_detailed(&self) -> DomainResult<DrainReport> {
        let entries = self
            .outbox
            .claim_pending(
                &self.config.claimant,
                self.config.batch_size,
                self.config.lease,
            )
            .await?;

        let mut report = DrainReport {
            claimed: entries.len(),
            ..Default::default()
        };

        for entry in &entries {
            match self.handoff(entry).await {
                Ok(Handoff::Queued) => {
                    report.processed += 1;
                    report.jobs_queued += 1;
                }
                Ok(Handoff::Skipped) => {
                    report.processed += 1;
                    report.skipped += 1;
                }
                Ok(Handoff::AlreadyProcessed) => {}
                Err(err) => {
                    error!(
                        outbox_id = %entry.id(),
                        event_type = entry.event_type(),
                        error = %err,
                        "outbox entry handoff failed; left unprocessed"
                    );
                    match self
                        .outbox
                        .release(entry.id(), &self.config.claimant)
                        .await
                    {
                        Ok(true) => {}
                        Ok(false) => warn!(
                            outbox_id = %entry.id(),
                            "claim no longer held; entry left to its current owner"
                        ),
                        Err(release_err) => warn!(
                            outbox_id = %entry.id(),
                            error = %release_err,
                            "failed to release claim; entry waits for lease expiry"
                        ),
                    }
                    report.failed.push(entry.id());
                }
            }
        }

        if report.claimed > 0 {
            info!(
                claimed = report.claimed,
                processed = report.processed,
                jobs_queued = report.jobs_queued,
                skipped = report.skipped,
                failed = report.failed.len(),
                "outbox drain finished"
            );
        }

        Ok(report)
    }

    /// 积压统计（只读）
    pub async fn stats(&self) -> DomainResult<OutboxStats> {
        self.outbox.stats().await
    }

    /// 预先创建两侧的表结构
    pub async fn ensure_schemas(&self) -> DomainResult<()> {
        self.outbox.ensure_schema().await?;
        self.jobs.ensure_schema().await
    }

    async fn handoff(&self, entry: &OutboxEntry) -> DomainResult<Handoff> {
        let data = entry.payload()?;

        let queued = match self.router.resolve(entry.event_type()) {
            Some(job) => {
                let record = JobRecord::queued(&self.config.queue, job, data, Utc::now());
                self.jobs.push(&record).await?;
                debug!(outbox_id = %entry.id(), job, job_id = %record.id(), "job queued");
                true
            }
            None => {
                debug!(
                    outbox_id = %entry.id(),
                    event_type = entry.event_type(),
                    "no job route; skipping"
                );
                false
            }
        };

        if !self.outbox.mark_processed(entry.id(), Utc::now()).await? {
            warn!(outbox_id = %entry.id(), "outbox entry was already processed");
            return Ok(Handoff::AlreadyProcessed);
        }

        Ok(if queued {
            Handoff::Queued
        } else {
            Handoff::Skipped
        })
    }
}
