//! Postgres 版作业存储（PgJobStore）
//!
//! 使用独立于 Outbox 的连接池（独立数据源），首次写入时幂等建表。
//!
use super::record::JobRecord;
use super::store::JobStore;
use crate::error::{DomainError, DomainResult};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tokio::sync::OnceCell;
use tracing::debug;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id UUID PRIMARY KEY,
    queue TEXT NOT NULL,
    payload JSONB NOT NULL,
    attempts INTEGER NOT NULL DEFAULT 0,
    reserved_at TIMESTAMPTZ NULL,
    available_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS jobs_queue_available_at_idx ON jobs (queue, available_at)";

pub struct PgJobStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgJobStore {
    /// 使用作业库的连接池创建（不要与 Outbox 共用）
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn ensure_schema(&self) -> DomainResult<()> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
                debug!("jobs schema ready");
                Ok::<_, DomainError>(())
            })
            .await?;
        Ok(())
    }

    async fn push(&self, job: &JobRecord) -> DomainResult<()> {
        self.ensure_schema().await?;
        let attempts = i32::try_from(job.attempts())
            .map_err(|e| DomainError::job_store(format!("attempts out of range: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO jobs (id, queue, payload, attempts, reserved_at, available_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(job.id())
        .bind(job.queue())
        .bind(Json(job.payload()))
        .bind(attempts)
        .bind(job.reserved_at())
        .bind(job.available_at())
        .bind(job.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
