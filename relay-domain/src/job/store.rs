use super::record::JobRecord;
use crate::error::DomainResult;
use async_trait::async_trait;

/// 作业存储写入协议（中继只写不读）
#[async_trait]
pub trait JobStore: Send + Sync {
    /// 幂等建表；默认无事可做
    async fn ensure_schema(&self) -> DomainResult<()> {
        Ok(())
    }

    /// 插入一条排队中的作业
    async fn push(&self, job: &JobRecord) -> DomainResult<()>;
}
