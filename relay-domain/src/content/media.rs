use chrono::{DateTime, Utc};

use crate::aggregate::Aggregate;
use crate::domain_event::EventRecorder;
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct MediaUploaded {
    pub media_id: String,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(MediaUploaded, |e| {
    "media_id" => e.media_id,
    "filename" => e.filename,
    "mime_type" => e.mime_type,
    "size_bytes" => e.size_bytes,
});

#[derive(Debug, Clone, PartialEq)]
pub struct MediaDeleted {
    pub media_id: String,
    pub filename: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(MediaDeleted, |e| {
    "media_id" => e.media_id,
    "filename" => e.filename,
});

/// 媒体文件聚合
#[derive(Debug, Clone)]
pub struct Media {
    id: String,
    filename: String,
    mime_type: String,
    size_bytes: u64,
    deleted: bool,
    events: EventRecorder,
}

impl Media {
    pub fn upload(
        id: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> DomainResult<Self> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(DomainError::invalid_value("media filename must not be empty"));
        }
        if size_bytes == 0 {
            return Err(DomainError::invalid_value("media file is empty"));
        }

        let mut media = Self {
            id: id.into(),
            filename,
            mime_type: mime_type.into(),
            size_bytes,
            deleted: false,
            events: EventRecorder::new(),
        };
        media.events.record(MediaUploaded {
            media_id: media.id.clone(),
            filename: media.filename.clone(),
            mime_type: media.mime_type.clone(),
            size_bytes,
            occurred_at: Utc::now(),
        });

        Ok(media)
    }

    pub fn delete(&mut self) -> DomainResult<()> {
        if self.deleted {
            return Err(DomainError::invalid_state(format!(
                "media {} is already deleted",
                self.id
            )));
        }

        self.deleted = true;
        self.events.record(MediaDeleted {
            media_id: self.id.clone(),
            filename: self.filename.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl Aggregate for Media {
    const TYPE: &'static str = "media";
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
