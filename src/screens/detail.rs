use tracing::{debug, warn};

use super::{Outcome, ScreenScope};
use crate::error::AppError;
use crate::form::{self, EditForm, Field, FieldErrors};
use crate::models::{Task, TaskId, TaskStatus};
use crate::state::AppState;

pub const TITLE: &str = "Task Details";

/// Request in flight while the edit form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditBusy {
    Idle,
    Saving,
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMode {
    Loading,
    Failed {
        message: String,
    },
    Viewing {
        task: Task,
        deleting: bool,
    },
    Editing {
        task: Task,
        form: EditForm,
        errors: FieldErrors,
        busy: EditBusy,
    },
    Deleted,
}

pub struct DetailScreen {
    app: AppState,
    scope: ScreenScope,
    id: TaskId,
    mode: DetailMode,
}

impl DetailScreen {
    pub fn new(app: AppState, id: TaskId) -> Self {
        Self {
            app,
            scope: ScreenScope::new(),
            id,
            mode: DetailMode::Loading,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn task_id(&self) -> TaskId {
        self.id
    }

    pub fn mode(&self) -> &DetailMode {
        &self.mode
    }

    pub fn task(&self) -> Option<&Task> {
        match &self.mode {
            DetailMode::Viewing { task, .. } | DetailMode::Editing { task, .. } => Some(task),
            _ => None,
        }
    }

    /// Label/value rows of the read-only view.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let Some(task) = self.task() else {
            return Vec::new();
        };
        vec![
            ("Title:", task.title.clone()),
            ("Description:", task.description.clone()),
            ("Task status:", task.status.label().to_string()),
            ("Created at:", task.created_at.clone()),
        ]
    }

    /// Initial fetch on mount.
    pub async fn load(&mut self) -> Outcome {
        self.mode = DetailMode::Loading;
        match self.fetch().await {
            Ok(task) => {
                self.mode = DetailMode::Viewing {
                    task,
                    deleting: false,
                };
                Outcome::Done
            }
            Err(AppError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                warn!("failed to load task {}: {}", self.id, e);
                self.mode = DetailMode::Failed {
                    message: e.to_string(),
                };
                Outcome::Failed
            }
        }
    }

    pub async fn retry(&mut self) -> Outcome {
        if !matches!(self.mode, DetailMode::Failed { .. }) {
            return Outcome::Ignored;
        }
        self.load().await
    }

    async fn fetch(&self) -> Result<Task, AppError> {
        let api = self.app.api.clone();
        let task = self.scope.run(api.get_task(self.id)).await?;
        if task.id != self.id {
            return Err(AppError::Unexpected(format!(
                "asked for task {} but got {}",
                self.id, task.id
            )));
        }
        Ok(task)
    }

    pub fn begin_edit(&mut self) -> bool {
        let DetailMode::Viewing {
            task,
            deleting: false,
        } = &self.mode
        else {
            return false;
        };
        let task = task.clone();
        self.mode = DetailMode::Editing {
            form: EditForm::from_task(&task),
            task,
            errors: FieldErrors::default(),
            busy: EditBusy::Idle,
        };
        true
    }

    pub fn cancel_edit(&mut self) -> bool {
        let DetailMode::Editing {
            task,
            busy: EditBusy::Idle,
            ..
        } = &self.mode
        else {
            return false;
        };
        self.mode = DetailMode::Viewing {
            task: task.clone(),
            deleting: false,
        };
        true
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.edit_field(Field::Title, |form| form.draft.title = title.into())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        self.edit_field(Field::Description, |form| {
            form.draft.description = description.into()
        })
    }

    pub fn set_status(&mut self, status: TaskStatus) -> bool {
        match &mut self.mode {
            DetailMode::Editing { form, .. } => {
                form.status = status;
                true
            }
            _ => false,
        }
    }

    fn edit_field(&mut self, field: Field, apply: impl FnOnce(&mut EditForm)) -> bool {
        match &mut self.mode {
            DetailMode::Editing { form, errors, .. } => {
                apply(form);
                form::revalidate(errors, &form.draft, field);
                true
            }
            _ => false,
        }
    }

    fn set_busy(&mut self, next: EditBusy) {
        if let DetailMode::Editing { busy, .. } = &mut self.mode {
            *busy = next;
        }
    }

    pub async fn save(&mut self) -> Outcome {
        let request = match &mut self.mode {
            DetailMode::Editing {
                form,
                errors,
                busy: EditBusy::Idle,
                ..
            } => match form.to_update_request() {
                Ok(request) => {
                    *errors = FieldErrors::default();
                    request
                }
                Err(invalid) => {
                    *errors = invalid;
                    return Outcome::Invalid;
                }
            },
            _ => return Outcome::Ignored,
        };

        self.set_busy(EditBusy::Saving);
        let api = self.app.api.clone();
        let result = self.scope.run(api.update_task(self.id, request)).await;

        let updated = match result {
            Ok(updated) => updated,
            Err(AppError::Cancelled) => return Outcome::Cancelled,
            Err(e) => {
                warn!("failed to update task {}: {}", self.id, e);
                self.set_busy(EditBusy::Idle);
                self.app.snackbar.error("Failed to update task");
                return Outcome::Failed;
            }
        };

        let task = match self.fetch().await {
            Ok(fresh) => fresh,
            Err(AppError::Cancelled) => return Outcome::Cancelled,
            Err(e) => {
                debug!("re-fetch after save failed, showing PUT response: {}", e);
                updated
            }
        };
        self.mode = DetailMode::Viewing {
            task,
            deleting: false,
        };
        Outcome::Done
    }

    pub async fn delete(&mut self) -> Outcome {
        let previous = self.mode.clone();
        match &mut self.mode {
            DetailMode::Viewing { deleting, .. } if !*deleting => *deleting = true,
            DetailMode::Editing { busy, .. } if *busy == EditBusy::Idle => {
                *busy = EditBusy::Deleting
            }
            _ => return Outcome::Ignored,
        }

        let api = self.app.api.clone();
        match self.scope.run(api.delete_task(self.id)).await {
            Ok(()) => {
                debug!("deleted task {}", self.id);
                self.mode = DetailMode::Deleted;
                Outcome::Exit
            }
            Err(AppError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                warn!("failed to delete task {}: {}", self.id, e);
                self.mode = previous;
                self.app.snackbar.error("Failed to delete task");
                Outcome::Failed
            }
        }
    }
}
