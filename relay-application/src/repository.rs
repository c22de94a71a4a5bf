//! 中继仓储（RelayingRepository）
//!
//! 释放事件与保存绑定在同一个方法里：
//! - `persist` 失败时事件保留在聚合中，不会分发也不会写入 Outbox；
//! - `persist` 成功后立即 `release_events` 并交给 `EventRelay`。
//!
use crate::error::AppError;
use crate::event_relay::EventRelay;
use async_trait::async_trait;
use relay_domain::aggregate::Aggregate;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// 聚合状态的持久化端口
#[async_trait]
pub trait AggregateStore<A>: Send + Sync
where
    A: Aggregate,
{
    async fn load(&self, id: &A::Id) -> Result<Option<A>, AppError>;

    /// 持久化聚合当前状态（不包含事件缓冲）
    async fn persist(&self, aggregate: &A) -> Result<(), AppError>;
}

#[async_trait]
impl<A, T> AggregateStore<A> for Arc<T>
where
    A: Aggregate,
    T: AggregateStore<A> + ?Sized,
{
    async fn load(&self, id: &A::Id) -> Result<Option<A>, AppError> {
        (**self).load(id).await
    }

    async fn persist(&self, aggregate: &A) -> Result<(), AppError> {
        (**self).persist(aggregate).await
    }
}

pub struct RelayingRepository<A, S>
where
    A: Aggregate,
    S: AggregateStore<A>,
{
    store: S,
    relay: EventRelay,
    _marker: PhantomData<fn() -> A>,
}

impl<A, S> RelayingRepository<A, S>
where
    A: Aggregate,
    S: AggregateStore<A>,
{
    pub fn new(store: S, relay: EventRelay) -> Self {
        Self {
            store,
            relay,
            _marker: PhantomData,
        }
    }

    pub async fn load(&self, id: &A::Id) -> Result<Option<A>, AppError> {
        self.store.load(id).await
    }

    /// 加载聚合，不存在时返回 `AggregateNotFound`
    pub async fn get(&self, id: &A::Id) -> Result<A, AppError> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| AppError::AggregateNotFound(format!("{}:{}", A::TYPE, id)))
    }

    /// 持久化后释放并中继事件，返回对应的 Outbox 行 ID
    pub async fn save(&self, aggregate: &mut A) -> Result<Vec<Uuid>, AppError> {
        self.store.persist(aggregate).await?;
        let events = aggregate.release_events();
        self.relay.relay(events).await
    }
}
