//! relay-worker：把 outbox 中未处理的领域事件交接到作业库
//!
//! - `relay-worker init`：建表
//! - `relay-worker drain`：执行一次 drain
//! - `relay-worker run --interval-secs 5`：周期 drain，Ctrl-C 后在两次 drain 之间退出
//! - `relay-worker stats`：输出积压统计
//!
use anyhow::Result;
use clap::Parser;
use relay_domain::job::PgJobStore;
use relay_domain::outbox::PgOutboxStore;
use relay_domain::processor::{DrainScheduler, OutboxProcessor, ProcessorConfig};
use std::sync::Arc;
use tracing::info;

mod config;
mod db;

use config::{Cli, Command, scheduler_config};
use db::connect_database;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "relay_worker=info,relay_domain=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let processor_config = match &cli.command {
        Command::Drain(drain) | Command::Run { drain, .. } => drain.processor_config(),
        Command::Init | Command::Stats => ProcessorConfig::default(),
    };
    let processor = Arc::new(build_processor(&cli, processor_config).await?);

    match cli.command {
        Command::Init => {
            processor.ensure_schemas().await?;
            info!("outbox and jobs schemas ready");
        }
        Command::Drain(_) => {
            let report = processor.process_detailed().await?;
            println!(
                "claimed={} processed={} jobs_queued={} skipped={} failed={}",
                report.claimed,
                report.processed,
                report.jobs_queued,
                report.skipped,
                report.failed.len()
            );
        }
        Command::Run { interval_secs, .. } => {
            let config = scheduler_config(interval_secs);
            info!(interval = ?config.interval, "outbox relay started");

            let handle = DrainScheduler::new(processor, config).start();
            tokio::signal::ctrl_c().await?;

            info!("shutdown requested; waiting for the current drain");
            handle.shutdown();
            handle.join().await;
        }
        Command::Stats => {
            let stats = processor.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

async fn build_processor(cli: &Cli, config: ProcessorConfig) -> Result<OutboxProcessor> {
    let outbox_pool = connect_database(&cli.db.outbox_url, cli.db.max_connections).await?;
    let jobs_pool = connect_database(cli.db.jobs_url(), cli.db.max_connections).await?;

    Ok(OutboxProcessor::builder()
        .outbox(Arc::new(PgOutboxStore::new(outbox_pool)))
        .jobs(Arc::new(PgJobStore::new(jobs_pool)))
        .config(config)
        .build())
}
