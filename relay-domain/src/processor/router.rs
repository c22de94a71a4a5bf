use std::collections::HashMap;

/// 事件类型到作业名的路由表
///
/// 未登记的事件类型不会产生作业（视为“未配置处理”，不是错误）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRouter {
    routes: HashMap<String, String>,
}

impl JobRouter {
    /// 空路由表：所有事件都会被跳过
    pub fn empty() -> Self {
        Self::default()
    }

    /// CMS 默认路由
    pub fn cms_defaults() -> Self {
        Self::empty()
            .route("ArticleCreated", "send-article-notification")
            .route("ArticlePublished", "reindex-article")
            .route("ArticleUpdated", "reindex-article")
            .route("ArticleDeleted", "remove-article-index")
            .route("FormSubmitted", "send-form-notification")
    }

    /// 添加或覆盖一条路由
    pub fn route(mut self, event_type: impl Into<String>, job: impl Into<String>) -> Self {
        self.routes.insert(event_type.into(), job.into());
        self
    }

    /// 移除一条路由
    pub fn without(mut self, event_type: &str) -> Self {
        self.routes.remove(event_type);
        self
    }

    pub fn resolve(&self, event_type: &str) -> Option<&str> {
        self.routes.get(event_type).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for JobRouter
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |router, (event_type, job)| router.route(event_type, job))
    }
}
