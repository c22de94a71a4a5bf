use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::domain_event::{EventRecorder, Payload};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmitted {
    pub form_id: String,
    pub form_name: String,
    pub submission_id: String,
    pub values: Payload,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(FormSubmitted, |e| {
    "form_id" => e.form_id,
    "form_name" => e.form_name,
    "submission_id" => e.submission_id,
    "values" => e.values,
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub required: bool,
}

impl FormField {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// 表单聚合：提交经字段校验后记录 `FormSubmitted`
#[derive(Debug, Clone)]
pub struct Form {
    id: String,
    name: String,
    fields: Vec<FormField>,
    submissions: u64,
    events: EventRecorder,
}

impl Form {
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields,
            submissions: 0,
            events: EventRecorder::new(),
        }
    }

    /// 提交表单，返回提交编号
    pub fn submit(&mut self, values: Payload) -> DomainResult<String> {
        if let Some(unknown) = values
            .keys()
            .find(|k| !self.fields.iter().any(|f| &f.name == *k))
        {
            return Err(DomainError::invalid_value(format!(
                "form {} has no field {unknown}",
                self.id
            )));
        }

        for field in self.fields.iter().filter(|f| f.required) {
            let present = values
                .get(&field.name)
                .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
            if !present {
                return Err(DomainError::invalid_value(format!(
                    "field {} is required",
                    field.name
                )));
            }
        }

        let submission_id = Uuid::new_v4().to_string();
        self.submissions += 1;
        self.events.record(FormSubmitted {
            form_id: self.id.clone(),
            form_name: self.name.clone(),
            submission_id: submission_id.clone(),
            values,
            occurred_at: Utc::now(),
        });

        Ok(submission_id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl Aggregate for Form {
    const TYPE: &'static str = "form";
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
