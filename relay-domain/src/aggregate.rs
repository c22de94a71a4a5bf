//! 聚合（Aggregate）抽象
//!
//! 约束一个可记录领域事件的聚合：
//! - 具备稳定标识，事件载荷中嵌入该标识；
//! - 持有私有的 `EventRecorder`，业务方法在不变量校验通过后作为最后一步记录事件；
//! - 应用服务在聚合持久化成功后调用一次 `release_events`。
//!
use crate::domain_event::{EventRecorder, SharedEvent};
use std::fmt::Display;

/// 可记录领域事件的聚合根接口
pub trait Aggregate: Send + Sync {
    const TYPE: &'static str;

    /// 聚合标识类型
    type Id: Clone + Display + Send + Sync;

    /// 获取聚合标识
    fn id(&self) -> &Self::Id;

    /// 事件缓冲（只读）
    fn event_recorder(&self) -> &EventRecorder;

    /// 事件缓冲（可变），仅供聚合自身与释放流程使用
    fn event_recorder_mut(&mut self) -> &mut EventRecorder;

    /// 取走自上次释放以来的全部事件（一次性）
    fn release_events(&mut self) -> Vec<SharedEvent> {
        self.event_recorder_mut().release()
    }

    /// 查看待释放事件（用于检查与测试断言）
    fn pending_events(&self) -> &[SharedEvent] {
        self.event_recorder().pending()
    }

    /// 丢弃待释放事件
    fn clear_events(&mut self) {
        self.event_recorder_mut().clear();
    }
}
