use super::record::JobRecord;
use super::store::JobStore;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 内存版作业存储，按插入顺序保存作业
#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    jobs: Arc<Mutex<Vec<JobRecord>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.jobs.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn push(&self, job: &JobRecord) -> DomainResult<()> {
        self.jobs.lock().await.push(job.clone());
        Ok(())
    }
}
