use std::time::Duration;

use tracing::{info, warn};

use super::{Outcome, ScreenScope};
use crate::error::AppError;
use crate::form::{self, Field, FieldErrors, TaskDraft};
use crate::state::AppState;

pub const TITLE: &str = "New Task";
const CREATED_NOTICE: Duration = Duration::from_millis(2000);

pub struct CreateScreen {
    app: AppState,
    scope: ScreenScope,
    draft: TaskDraft,
    errors: FieldErrors,
    submitting: bool,
}

impl CreateScreen {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            scope: ScreenScope::new(),
            draft: TaskDraft::default(),
            errors: FieldErrors::default(),
            submitting: false,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        form::revalidate(&mut self.errors, &self.draft, Field::Title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        form::revalidate(&mut self.errors, &self.draft, Field::Description);
    }

    pub async fn submit(&mut self) -> Outcome {
        if self.submitting {
            return Outcome::Ignored;
        }
        let request = match self.draft.validate() {
            Ok(valid) => valid.into_create_request(),
            Err(errors) => {
                self.errors = errors;
                return Outcome::Invalid;
            }
        };
        self.errors = FieldErrors::default();

        self.submitting = true;
        let api = self.app.api.clone();
        let result = self.scope.run(api.create_task(request)).await;
        self.submitting = false;

        match result {
            Ok(task) => {
                info!("created task {}", task.id);
                self.app
                    .snackbar
                    .show("Task added successfully", CREATED_NOTICE);
                Outcome::Exit
            }
            Err(AppError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                warn!("failed to create task: {}", e);
                self.app.snackbar.error("Failed to add task");
                Outcome::Failed
            }
        }
    }
}
