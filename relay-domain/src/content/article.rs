use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{changes_payload, slugify};
use crate::aggregate::Aggregate;
use crate::domain_event::{EventRecorder, FieldChanged};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCreated {
    pub article_id: String,
    pub title: String,
    pub slug: String,
    pub author_id: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(ArticleCreated, |e| {
    "article_id" => e.article_id,
    "title" => e.title,
    "slug" => e.slug,
    "author_id" => e.author_id,
});

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleUpdated {
    pub article_id: String,
    pub title: String,
    pub changes: Vec<(String, FieldChanged<String>)>,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(ArticleUpdated, |e| {
    "article_id" => e.article_id,
    "title" => e.title,
    "changes" => changes_payload(&e.changes),
});

#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePublished {
    pub article_id: String,
    pub title: String,
    pub slug: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(ArticlePublished, |e| {
    "article_id" => e.article_id,
    "title" => e.title,
    "slug" => e.slug,
});

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDeleted {
    pub article_id: String,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(ArticleDeleted, |e| {
    "article_id" => e.article_id,
    "title" => e.title,
});

/// 文章聚合
#[derive(Debug, Clone)]
pub struct Article {
    id: String,
    title: String,
    slug: String,
    body: String,
    author_id: String,
    status: ArticleStatus,
    events: EventRecorder,
}

impl Article {
    /// 创建草稿文章并记录 `ArticleCreated`
    pub fn create(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        author_id: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into();
        ensure_title(&title)?;

        let mut article = Self {
            id: id.into(),
            slug: slugify(&title),
            title,
            body: body.into(),
            author_id: author_id.into(),
            status: ArticleStatus::Draft,
            events: EventRecorder::new(),
        };

        article.events.record(ArticleCreated {
            article_id: article.id.clone(),
            title: article.title.clone(),
            slug: article.slug.clone(),
            author_id: article.author_id.clone(),
            occurred_at: Utc::now(),
        });

        Ok(article)
    }

    /// 从持久化状态还原（不产生事件），slug 沿用已保存的值
    pub fn restore(
        id: impl Into<String>,
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
        author_id: impl Into<String>,
        status: ArticleStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            body: body.into(),
            author_id: author_id.into(),
            status,
            events: EventRecorder::new(),
        }
    }

    /// 修改标题/正文；没有实际变化时返回 `false` 且不记录事件
    pub fn update(&mut self, title: Option<String>, body: Option<String>) -> DomainResult<bool> {
        self.ensure_not_deleted()?;
        if let Some(title) = &title {
            ensure_title(title)?;
        }

        let mut changes = Vec::new();
        if let Some(change) = title.and_then(|t| FieldChanged::diff(self.title.clone(), t)) {
            changes.push(("title".to_string(), change));
        }
        if let Some(change) = body.and_then(|b| FieldChanged::diff(self.body.clone(), b)) {
            changes.push(("body".to_string(), change));
        }
        if changes.is_empty() {
            return Ok(false);
        }

        for (field, change) in &changes {
            match field.as_str() {
                "title" => {
                    self.title = change.new.clone();
                    self.slug = slugify(&self.title);
                }
                _ => self.body = change.new.clone(),
            }
        }

        self.events.record(ArticleUpdated {
            article_id: self.id.clone(),
            title: self.title.clone(),
            changes,
            occurred_at: Utc::now(),
        });

        Ok(true)
    }

    pub fn publish(&mut self) -> DomainResult<()> {
        self.ensure_not_deleted()?;
        if self.status == ArticleStatus::Published {
            return Err(DomainError::invalid_state(format!(
                "article {} is already published",
                self.id
            )));
        }

        self.status = ArticleStatus::Published;
        self.events.record(ArticlePublished {
            article_id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            occurred_at: Utc::now(),
        });

        Ok(())
    }

    pub fn delete(&mut self) -> DomainResult<()> {
        self.ensure_not_deleted()?;

        self.status = ArticleStatus::Deleted;
        self.events.record(ArticleDeleted {
            article_id: self.id.clone(),
            title: self.title.clone(),
            occurred_at: Utc::now(),
        });

        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn status(&self) -> ArticleStatus {
        self.status
    }

    fn ensure_not_deleted(&self) -> DomainResult<()> {
        if self.status == ArticleStatus::Deleted {
            return Err(DomainError::invalid_state(format!(
                "article {} is deleted",
                self.id
            )));
        }
        Ok(())
    }
}

fn ensure_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::invalid_value("article title must not be empty"));
    }
    Ok(())
}

impl Aggregate for Article {
    const TYPE: &'static str = "article";
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn event_recorder(&self) -> &EventRecorder {
        &self.events
    }

    fn event_recorder_mut(&mut self) -> &mut EventRecorder {
        &mut self.events
    }
}
