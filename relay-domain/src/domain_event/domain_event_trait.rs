use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// 事件载荷：字段名到标量/嵌套值的有序映射（依赖 serde_json 的 `preserve_order`）
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// 已记录、可在分发与追加间共享的事件
pub type SharedEvent = Arc<dyn DomainEvent>;

/// 领域事件需要满足的通用能力边界
///
/// 事件本身不单独标识，身份由载荷中所属聚合的 id 推导；
/// 载荷必须自描述，消费方仅凭载荷即可还原意图。
pub trait DomainEvent: fmt::Debug + Send + Sync {
    /// 事件类型标签（如 `ArticlePublished`），用于分发与作业路由
    fn event_type(&self) -> &str;

    /// 事件发生时间（构造时确定，不可变）
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 事件载荷
    fn payload(&self) -> Payload;
}
