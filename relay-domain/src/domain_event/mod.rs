//! 领域事件（Domain Event）与聚合事件缓冲
//!
//! 定义事件需要实现的最小接口（`DomainEvent`）、自描述的有序载荷（`Payload`），
//! 以及聚合私有的一次性释放缓冲 `EventRecorder`。

mod domain_event_trait;
mod event_recorder;
mod field_changed;
mod generic_event;

pub use domain_event_trait::{DomainEvent, Payload, SharedEvent};
pub use event_recorder::EventRecorder;
pub use field_changed::FieldChanged;
pub use generic_event::GenericEvent;

/// 构造有序载荷：按书写顺序插入字段，值需实现 `Serialize`
///
/// ```
/// use relay_domain::payload;
///
/// let p = payload! { "article_id" => "a1", "title" => "Hello" };
/// assert_eq!(p.keys().collect::<Vec<_>>(), vec!["article_id", "title"]);
/// ```
#[macro_export]
macro_rules! payload {
    ($($key:literal => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::domain_event::Payload::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::__serde_json::json!($value),
            );
        )*
        map
    }};
}
