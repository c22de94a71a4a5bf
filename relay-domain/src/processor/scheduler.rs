//! 周期调度器（DrainScheduler）
//!
//! 以固定间隔串行调用 `OutboxProcessor::process_detailed` 的长驻任务：
//! - 同一调度器内任意时刻最多一个 drain 在运行；
//! - 关闭只在两次 drain 之间生效，不会打断进行中的批次；
//! - 提供关闭与等待的 `SchedulerHandle`。
//!
use super::OutboxProcessor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// 调度器配置
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// 两次 drain 的间隔
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

pub struct DrainScheduler {
    processor: Arc<OutboxProcessor>,
    config: SchedulerConfig,
}

impl DrainScheduler {
    pub fn new(processor: Arc<OutboxProcessor>, config: SchedulerConfig) -> Self {
        Self { processor, config }
    }

    /// 启动调度，返回可用于关闭/等待的句柄；首次 drain 立即执行
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    // 取消只在等待下一次 tick 时生效，进行中的批次总会完成
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => match self.processor.process_detailed().await {
                        Ok(report) if !report.failed.is_empty() => warn!(
                            failed = report.failed.len(),
                            "outbox entries left for the next drain"
                        ),
                        Ok(_) => {}
                        Err(err) => error!(error = %err, "outbox drain failed"),
                    },
                }
            }
            debug!("drain scheduler stopped");
        });

        SchedulerHandle {
            token,
            task: Some(task),
        }
    }
}

/// 调度句柄；丢弃时同样会请求关闭
pub struct SchedulerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// 请求在当前 drain 结束后停止
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// 等待调度任务退出（需先 `shutdown`）
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(error = %err, "drain scheduler task aborted");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
