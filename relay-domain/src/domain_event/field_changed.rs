use serde::Serialize;

/// 单个字段的前后值，序列化为 `{"old": .., "new": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChanged<T> {
    pub old: T,
    pub new: T,
}

impl<T: PartialEq> FieldChanged<T> {
    /// 值相同返回 `None`，未改动的字段不进入事件
    pub fn diff(old: T, new: T) -> Option<Self> {
        (old != new).then_some(Self { old, new })
    }
}
