use crate::error::AppError;
use crate::repository::AggregateStore;
use async_trait::async_trait;
use dashmap::DashMap;
use relay_domain::aggregate::Aggregate;

/// 基于内存的聚合存储
/// - 以 `id.to_string()` 为键保存聚合快照
/// - 快照不携带待释放事件，重新加载的聚合缓冲为空
pub struct InMemoryAggregateStore<A> {
    items: DashMap<String, A>,
}

impl<A> Default for InMemoryAggregateStore<A> {
    fn default() -> Self {
        Self {
            items: DashMap::new(),
        }
    }
}

impl<A> InMemoryAggregateStore<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<A> AggregateStore<A> for InMemoryAggregateStore<A>
where
    A: Aggregate + Clone + 'static,
{
    async fn load(&self, id: &A::Id) -> Result<Option<A>, AppError> {
        Ok(self.items.get(&id.to_string()).map(|a| a.clone()))
    }

    async fn persist(&self, aggregate: &A) -> Result<(), AppError> {
        let mut snapshot = aggregate.clone();
        snapshot.clear_events();
        self.items.insert(aggregate.id().to_string(), snapshot);
        Ok(())
    }
}
