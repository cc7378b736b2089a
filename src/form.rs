use std::collections::BTreeMap;
use std::fmt;

use crate::models::{NewTaskRequest, Task, TaskStatus, UpdateTaskRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => f.write_str("title"),
            Field::Description => f.write_str("description"),
        }
    }
}

/// Validation messages keyed by the field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }

    fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

/// Title and description as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

/// A draft that passed validation. Values are kept as typed; only an empty
/// description is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: Option<String>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<ValidDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Title is required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidDraft {
            title: self.title.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
        })
    }
}

impl ValidDraft {
    pub fn into_create_request(self) -> NewTaskRequest {
        NewTaskRequest::new(self.title, self.description)
    }
}

/// The detail screen's edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub draft: TaskDraft,
    pub status: TaskStatus,
}

impl EditForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            draft: TaskDraft {
                title: task.title.clone(),
                description: task.description.clone(),
            },
            status: task.status,
        }
    }

    /// Full update carrying every editable field. An emptied description is
    /// sent as `""` so the server clears it.
    pub fn to_update_request(&self) -> Result<UpdateTaskRequest, FieldErrors> {
        let valid = self.draft.validate()?;
        Ok(UpdateTaskRequest {
            title: Some(valid.title),
            description: Some(valid.description.unwrap_or_default()),
            status: Some(self.status),
        })
    }
}

/// Re-validates a single field after the user edits it, so a fixed title
/// drops its error without waiting for the next submit.
pub fn revalidate(errors: &mut FieldErrors, draft: &TaskDraft, field: Field) {
    if errors.get(field).is_none() {
        return;
    }
    match draft.validate() {
        Ok(_) => errors.clear(field),
        Err(fresh) => match fresh.get(field) {
            Some(msg) => errors.insert(field, msg),
            None => errors.clear(field),
        },
    }
}
