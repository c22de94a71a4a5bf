//! 内容领域（content）
//!
//! CMS 中会产生领域事件的聚合：文章、页面、表单、媒体与用户。
//! 这里只保留触发事件所需的最小不变量，持久化与渲染不在本 crate 范围内。
//!

// 为事件结构体实现 `DomainEvent`：类型标签取结构体名，载荷末尾追加 `occurred_at`
macro_rules! domain_event {
    ($ty:ident, |$ev:ident| { $($key:literal => $value:expr),* $(,)? }) => {
        impl $crate::domain_event::DomainEvent for $ty {
            fn event_type(&self) -> &str {
                stringify!($ty)
            }

            fn occurred_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.occurred_at
            }

            fn payload(&self) -> $crate::domain_event::Payload {
                let $ev = self;
                $crate::payload! {
                    $($key => $value,)*
                    "occurred_at" => $ev.occurred_at.to_rfc3339(),
                }
            }
        }
    };
}

pub mod article;
pub mod form;
pub mod media;
pub mod page;
pub mod user;

pub use article::{Article, ArticleCreated, ArticleDeleted, ArticlePublished, ArticleStatus, ArticleUpdated};
pub use form::{Form, FormField, FormSubmitted};
pub use media::{Media, MediaDeleted, MediaUploaded};
pub use page::{Page, PageCreated, PageDeleted, PagePublished, PageUpdated};
pub use user::{
    User, UserLoggedIn, UserLoggedOut, UserPasswordChanged, UserPasswordResetRequested,
};

use crate::domain_event::{FieldChanged, Payload};

/// 由标题生成 URL 片段：小写字母数字保留，其余折叠为单个 `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// 将字段变更列表转换为 `{字段: {old, new}}` 形式的载荷
pub(crate) fn changes_payload(changes: &[(String, FieldChanged<String>)]) -> Payload {
    changes
        .iter()
        .map(|(field, change)| (field.clone(), serde_json::json!(change)))
        .collect()
}
