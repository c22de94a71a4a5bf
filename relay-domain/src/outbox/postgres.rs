//! Postgres 版 Outbox（PgOutboxStore）
//!
//! 与聚合主表位于同一数据库。`append` 使用连接池单独执行，相对已提交的聚合保存
//! 只能做到“尽力而为”；需要原子性时使用 `append_in`，在聚合保存所在事务内写入。
//!
use super::entry::{OutboxEntry, OutboxStats};
use super::store::{OutboxStore, lease_deadline};
use crate::domain_event::Payload;
use crate::error::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS outbox (
    id UUID PRIMARY KEY,
    event_type TEXT NOT NULL,
    event_data TEXT NOT NULL,
    processed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL,
    processed_at TIMESTAMPTZ NULL,
    reserved_by TEXT NULL,
    reserved_until TIMESTAMPTZ NULL
)
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS outbox_processed_created_at_idx ON outbox (processed, created_at)";

const INSERT: &str = r#"
INSERT INTO outbox (id, event_type, event_data, processed, created_at)
VALUES ($1, $2, $3, FALSE, $4)
"#;

const CLAIM: &str = r#"
WITH candidates AS (
    SELECT id FROM outbox
    WHERE processed = FALSE
      AND (reserved_until IS NULL OR reserved_until <= $1)
    ORDER BY created_at ASC
    LIMIT $2
    FOR UPDATE SKIP LOCKED
)
UPDATE outbox AS o
SET reserved_by = $3, reserved_until = $4
FROM candidates
WHERE o.id = candidates.id
RETURNING o.id, o.event_type, o.event_data, o.processed, o.created_at,
          o.processed_at, o.reserved_by, o.reserved_until
"#;

const COLUMNS: &str =
    "id, event_type, event_data, processed, created_at, processed_at, reserved_by, reserved_until";

#[derive(sqlx::FromRow)]
struct OutboxRow {
    id: Uuid,
    event_type: String,
    event_data: String,
    processed: bool,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    reserved_by: Option<String>,
    reserved_until: Option<DateTime<Utc>>,
}

impl From<OutboxRow> for OutboxEntry {
    fn from(row: OutboxRow) -> Self {
        OutboxEntry::builder()
            .id(row.id)
            .event_type(row.event_type)
            .event_data(row.event_data)
            .processed(row.processed)
            .created_at(row.created_at)
            .maybe_processed_at(row.processed_at)
            .maybe_reserved_by(row.reserved_by)
            .maybe_reserved_until(row.reserved_until)
            .build()
    }
}

pub struct PgOutboxStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgOutboxStore {
    /// 使用主数据库的连接池创建
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 在调用方事务内追加，与聚合保存同成同败
    pub async fn append_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_type: &str,
        payload: &Payload,
    ) -> DomainResult<Uuid> {
        self.ensure_schema().await?;
        let entry = OutboxEntry::pending(event_type, payload)?;

        sqlx::query(INSERT)
            .bind(entry.id())
            .bind(entry.event_type())
            .bind(entry.event_data())
            .bind(entry.created_at())
            .execute(&mut **tx)
            .await?;

        Ok(entry.id())
    }
}

#[async_trait]
impl OutboxStore for PgOutboxStore {
    async fn ensure_schema(&self) -> DomainResult<()> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
                debug!("outbox schema ready");
                Ok::<_, DomainError>(())
            })
            .await?;
        Ok(())
    }

    async fn append(&self, event_type: &str, payload: &Payload) -> DomainResult<Uuid> {
        self.ensure_schema().await?;
        let entry = OutboxEntry::pending(event_type, payload)?;

        sqlx::query(INSERT)
            .bind(entry.id())
            .bind(entry.event_type())
            .bind(entry.event_data())
            .bind(entry.created_at())
            .execute(&self.pool)
            .await?;

        Ok(entry.id())
    }

    async fn claim_pending(
        &self,
        claimant: &str,
        limit: usize,
        lease: Duration,
    ) -> DomainResult<Vec<OutboxEntry>> {
        let limit = i64::try_from(limit)
            .map_err(|e| DomainError::invalid_value(format!("claim limit out of range: {e}")))?;
        self.ensure_schema().await?;
        let now = Utc::now();
        let until = lease_deadline(now, lease)?;

        // SKIP LOCKED：并发认领者各自拿到不相交的行
        let mut rows: Vec<OutboxRow> = sqlx::query_as(CLAIM)
            .bind(now)
            .bind(limit)
            .bind(claimant)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        // RETURNING 不保证顺序
        rows.sort_by_key(|r| r.created_at);
        Ok(rows.into_iter().map(OutboxEntry::from).collect())
    }

    async fn mark_processed(&self, id: Uuid, processed_at: DateTime<Utc>) -> DomainResult<bool> {
        self.ensure_schema().await?;
        let result = sqlx::query(
            r#"
            UPDATE outbox
            SET processed = TRUE, processed_at = $2, reserved_by = NULL, reserved_until = NULL
            WHERE id = $1 AND processed = FALSE
            "#,
        )
        .bind(id)
        .bind(processed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, id: Uuid, claimant: &str) -> DomainResult<bool> {
        self.ensure_schema().await?;
        let result = sqlx::query(
            r#"
            UPDATE outbox
            SET reserved_by = NULL, reserved_until = NULL
            WHERE id = $1 AND processed = FALSE AND reserved_by = $2
            "#,
        )
        .bind(id)
        .bind(claimant)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<OutboxEntry>> {
        self.ensure_schema().await?;
        let row: Option<OutboxRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM outbox WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(OutboxEntry::from))
    }

    async fn stats(&self) -> DomainResult<OutboxStats> {
        self.ensure_schema().await?;
        let (total, processed): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE processed) FROM outbox",
        )
        .fetch_one(&self.pool)
        .await?;

        let total = total.max(0) as u64;
        let processed = processed.max(0) as u64;
        Ok(OutboxStats {
            total,
            pending: total - processed,
            processed,
        })
    }
}
