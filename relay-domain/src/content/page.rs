use chrono::{DateTime, Utc};

use super::{changes_payload, slugify};
use crate::aggregate::Aggregate;
use crate::domain_event::{EventRecorder, FieldChanged};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PageCreated {
    pub page_id: String,
    pub title: String,
    pub slug: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(PageCreated, |e| {
    "page_id" => e.page_id,
    "title" => e.title,
    "slug" => e.slug,
});

#[derive(Debug, Clone, PartialEq)]
pub struct PageUpdated {
    pub page_id: String,
    pub changes: Vec<(String, FieldChanged<String>)>,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(PageUpdated, |e| {
    "page_id" => e.page_id,
    "changes" => changes_payload(&e.changes),
});

#[derive(Debug, Clone, PartialEq)]
pub struct PagePublished {
    pub page_id: String,
    pub slug: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(PagePublished, |e| {
    "page_id" => e.page_id,
    "slug" => e.slug,
});

#[derive(Debug, Clone, PartialEq)]
pub struct PageDeleted {
    pub page_id: String,
    pub slug: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(PageDeleted, |e| {
    "page_id" => e.page_id,
    "slug" => e.slug,
});

/// 页面聚合
#[derive(Debug, Clone)]
pub struct Page {
    id: String,
    title: String,
    slug: String,
    published: bool,
    deleted: bool,
    events: EventRecorder,
}

impl Page {
    pub fn create(id: impl Into<String>, title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::invalid_value("page title must not be empty"));
        }

        let mut page = Self {
            id: id.into(),
            slug: slugify(&title),
            title,
            published: false,
            deleted: false,
            events: EventRecorder::new(),
        };
        page.events.record(PageCreated {
            page_id: page.id.clone(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            occurred_at: Utc::now(),
        });

        Ok(page)
    }

    /// 重命名页面，slug 随标题变化
    pub fn rename(&mut self, title: impl Into<String>) -> DomainResult<bool> {
        self.ensure_live()?;
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::invalid_value("page title must not be empty"));
        }

        let Some(title_change) = FieldChanged::diff(self.title.clone(), title) else {
            return Ok(false);
        };
        let new_slug = slugify(&title_change.new);

        let mut changes = vec![("title".to_string(), title_change)];
        if let Some(slug_change) = FieldChanged::diff(self.slug.clone(), new_slug) {
            changes.push(("slug".to_string(), slug_change));
        }

        self.title = changes[0].1.new.clone();
        self.slug = slugify(&self.title);
        self.events.record(PageUpdated {
            page_id: self.id.clone(),
            changes,
            occurred_at: Utc::now(),
        });

        Ok(true)
    }

    pub fn publish(&mut self) -> DomainResult<()> {
        self.ensure_live()?;
        if self.published {
            return Err(DomainError::invalid_state(format!(
                "page {} is already published",
                self.id
            )));
        }

        self.published = true;
        self.events.record(PagePublished {
            page_id: self.id.clone(),
            slug: self.slug.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    pub fn delete(&mut self) -> DomainResult<()> {
        self.ensure_live()?;

        self.deleted = true;
        self.events.record(PageDeleted {
            page_id: self.id.clone(),
            slug: self.slug.clone(),
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

    pub fn is_published(&self) -> bool {
        self.published
    }

    fn ensure_live(&self) -> DomainResult<()> {
        if self.deleted {
            return Err(DomainError::invalid_state(format!(
                "page {} is deleted",
                self.id
            )));
        }
        Ok(())
    }
}

impl Aggregate for Page {
    const TYPE: &'static str = "page";
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_records_title_and_slug_changes() {
        let mut page = Page::create("p1", "About Us").unwrap();
        page.release_events();

        assert!(page.rename("About The Team").unwrap());
        let payload = page.pending_events()[0].payload();
        assert_eq!(payload["changes"]["slug"]["new"], "about-the-team");

        assert!(!page.rename("About The Team").unwrap());
        assert_eq!(page.pending_events().len(), 1);
    }

    #[test]
    fn deleted_page_rejects_mutations() {
        let mut page = Page::create("p1", "Contact").unwrap();
        page.delete().unwrap();
        page.clear_events();

        assert!(page.publish().is_err());
        assert!(page.rename("x").is_err());
        assert!(page.pending_events().is_empty());
    }
}
