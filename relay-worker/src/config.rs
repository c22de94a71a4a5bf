use clap::{Args, Parser, Subcommand};
use relay_domain::processor::{ProcessorConfig, SchedulerConfig};
use std::time::Duration;

/// Outbox 中继工作进程
#[derive(Debug, Parser)]
#[command(name = "relay-worker", version, about = "Drains the outbox into the job store")]
pub struct Cli {
    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DatabaseArgs {
    /// 主数据库（outbox 表所在库）
    #[arg(long, env = "OUTBOX_DATABASE_URL")]
    pub outbox_url: String,

    /// 作业库；未设置时与主数据库相同
    #[arg(long, env = "JOBS_DATABASE_URL")]
    pub jobs_url: Option<String>,

    /// 每个连接池的最大连接数
    #[arg(long, env = "RELAY_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub fn jobs_url(&self) -> &str {
        self.jobs_url.as_deref().unwrap_or(&self.outbox_url)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 创建 outbox 与 jobs 表（幂等）
    Init,
    /// 执行一次 drain 并输出结果
    Drain(DrainArgs),
    /// 按固定间隔持续 drain，直到 Ctrl-C
    Run {
        #[command(flatten)]
        drain: DrainArgs,

        /// 两次 drain 的间隔（秒）
        #[arg(long, env = "RELAY_INTERVAL_SECS", default_value_t = 5)]
        interval_secs: u64,
    },
    /// 输出 outbox 积压统计（JSON）
    Stats,
}

#[derive(Debug, Clone, Args)]
pub struct DrainArgs {
    /// 单次 drain 的最大行数
    #[arg(long, env = "RELAY_BATCH_SIZE", default_value_t = 100)]
    pub batch_size: usize,

    /// 认领者标识，默认 `relay-<pid>`
    #[arg(long, env = "RELAY_CLAIMANT")]
    pub claimant: Option<String>,

    /// 认领租约（秒）
    #[arg(long, env = "RELAY_LEASE_SECS", default_value_t = 60)]
    pub lease_secs: u64,
}

impl DrainArgs {
    pub fn processor_config(&self) -> ProcessorConfig {
        let defaults = ProcessorConfig::default();
        ProcessorConfig {
            batch_size: self.batch_size,
            claimant: self.claimant.clone().unwrap_or(defaults.claimant),
            lease: Duration::from_secs(self.lease_secs),
            ..defaults
        }
    }
}

pub fn scheduler_config(interval_secs: u64) -> SchedulerConfig {
    SchedulerConfig {
        interval: Duration::from_secs(interval_secs.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_map_to_configs() {
        let cli = Cli::try_parse_from([
            "relay-worker",
            "--outbox-url",
            "postgres://localhost/cms",
            "run",
            "--batch-size",
            "25",
            "--claimant",
            "node-a",
            "--interval-secs",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.db.jobs_url(), "postgres://localhost/cms");
        let Command::Run {
            drain,
            interval_secs,
        } = cli.command
        else {
            panic!("expected run");
        };
        let config = drain.processor_config();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.claimant, "node-a");
        assert_eq!(config.lease, Duration::from_secs(60));
        assert_eq!(config.queue, "default");
        assert_eq!(scheduler_config(interval_secs).interval, Duration::from_secs(1));
    }

    #[test]
    fn separate_jobs_database_is_honoured() {
        let cli = Cli::try_parse_from([
            "relay-worker",
            "--outbox-url",
            "postgres://localhost/cms",
            "--jobs-url",
            "postgres://localhost/jobs",
            "stats",
        ])
        .unwrap();

        assert_eq!(cli.db.jobs_url(), "postgres://localhost/jobs");
        assert!(matches!(cli.command, Command::Stats));
    }
}
