use tracing::{debug, warn};

use super::{Outcome, ScreenScope};
use crate::error::AppError;
use crate::models::{Task, TaskId, UpdateTaskRequest};
use crate::state::AppState;

pub const TITLE: &str = "Task List";
pub const EMPTY_MESSAGE: &str = "Task list is empty";
pub const LOAD_ERROR_MESSAGE: &str = "Error fetching tasks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Failed(String),
    Ready(Vec<Task>),
}

/// What the list renders, derived from [`ListState`].
#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Rows(&'a [Task]),
}

pub struct ListScreen {
    app: AppState,
    scope: ScreenScope,
    state: ListState,
    refreshing: bool,
    row_updating: Option<TaskId>,
}

impl ListScreen {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            scope: ScreenScope::new(),
            state: ListState::Loading,
            refreshing: false,
            row_updating: None,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn tasks(&self) -> Option<&[Task]> {
        match &self.state {
            ListState::Ready(tasks) => Some(tasks),
            _ => None,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_row_updating(&self, id: TaskId) -> bool {
        self.row_updating == Some(id)
    }

    pub fn view(&self) -> ListView<'_> {
        match &self.state {
            ListState::Loading => ListView::Loading,
            ListState::Failed(_) => ListView::Error(LOAD_ERROR_MESSAGE),
            ListState::Ready(tasks) if tasks.is_empty() => ListView::Empty,
            ListState::Ready(tasks) => ListView::Rows(tasks),
        }
    }

    /// Runs every time the list becomes the active route.
    pub async fn on_focus(&mut self) -> Outcome {
        self.fetch().await
    }

    pub async fn refresh(&mut self) -> Outcome {
        self.refreshing = true;
        let outcome = self.fetch().await;
        self.refreshing = false;
        outcome
    }

    pub async fn retry(&mut self) -> Outcome {
        if !matches!(self.state, ListState::Failed(_)) {
            return Outcome::Ignored;
        }
        self.state = ListState::Loading;
        self.fetch().await
    }

    async fn fetch(&mut self) -> Outcome {
        let api = self.app.api.clone();
        match self.scope.run(api.list_tasks()).await {
            Ok(tasks) => {
                debug!("fetched {} tasks", tasks.len());
                self.state = ListState::Ready(tasks);
                Outcome::Done
            }
            Err(AppError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                warn!("failed to fetch tasks: {}", e);
                if matches!(self.state, ListState::Ready(_)) {
                    self.app.snackbar.error(LOAD_ERROR_MESSAGE);
                } else {
                    self.state = ListState::Failed(e.to_string());
                }
                Outcome::Failed
            }
        }
    }

    /// Quick action: flips a row between `to_do` and `done` and swaps in the
    /// server's copy of that one row.
    pub async fn toggle_status(&mut self, id: TaskId) -> Outcome {
        if self.row_updating.is_some() {
            return Outcome::Ignored;
        }
        let Some(next) = self
            .tasks()
            .and_then(|tasks| tasks.iter().find(|t| t.id == id))
            .map(|t| t.status.toggled())
        else {
            return Outcome::Ignored;
        };

        self.row_updating = Some(id);
        let api = self.app.api.clone();
        let result = self
            .scope
            .run(api.update_task(id, UpdateTaskRequest::status_only(next)))
            .await;
        self.row_updating = None;

        match result {
            Ok(updated) => {
                if let ListState::Ready(tasks) = &mut self.state {
                    if let Some(row) = tasks.iter_mut().find(|t| t.id == updated.id) {
                        *row = updated;
                    }
                }
                Outcome::Done
            }
            Err(AppError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                warn!("failed to toggle task {}: {}", id, e);
                self.app.snackbar.error("Failed to update task");
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::{MemoryTaskApi, TaskApi};
    use crate::models::{NewTaskRequest, TaskStatus};

    fn task(id: TaskId, title: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            status,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn screen(api: &Arc<MemoryTaskApi>) -> ListScreen {
        ListScreen::new(AppState::new(api.clone()))
    }

    #[tokio::test]
    async fn empty_collection_has_its_own_view() {
        let api = Arc::new(MemoryTaskApi::new());
        let mut list = screen(&api);
        assert_eq!(list.view(), ListView::Loading);

        assert_eq!(list.on_focus().await, Outcome::Done);
        assert_eq!(list.view(), ListView::Empty);
    }

    #[tokio::test]
    async fn toggle_replaces_only_the_matching_row() {
        let api = Arc::new(MemoryTaskApi::with_tasks(vec![
            task(1, "a", TaskStatus::ToDo),
            task(2, "b", TaskStatus::InProgress),
            task(3, "c", TaskStatus::Done),
        ]));
        let mut list = screen(&api);
        list.on_focus().await;
        let before = list.tasks().unwrap().to_vec();
        api.clear_requests();

        assert_eq!(list.toggle_status(1).await, Outcome::Done);
        assert_eq!(api.requests(), vec!["PUT /tasks/1"]);
        let after = list.tasks().unwrap();
        assert_eq!(after[0].status, TaskStatus::Done);
        assert_eq!(after[1..], before[1..]);

        list.toggle_status(1).await;
        assert_eq!(list.tasks().unwrap()[0].status, TaskStatus::ToDo);
        assert!(!list.is_row_updating(1));
    }

    #[tokio::test]
    async fn quick_toggle_from_in_progress_goes_to_to_do() {
        let api = Arc::new(MemoryTaskApi::with_tasks(vec![task(
            5,
            "x",
            TaskStatus::InProgress,
        )]));
        let mut list = screen(&api);
        list.on_focus().await;

        list.toggle_status(5).await;
        assert_eq!(list.tasks().unwrap()[0].status, TaskStatus::ToDo);
    }

    #[tokio::test]
    async fn failed_toggle_keeps_rows_and_notifies() {
        let api = Arc::new(MemoryTaskApi::with_tasks(vec![task(1, "a", TaskStatus::ToDo)]));
        let mut list = screen(&api);
        list.on_focus().await;
        api.fail_next(1);

        assert_eq!(list.toggle_status(1).await, Outcome::Failed);
        assert_eq!(list.tasks().unwrap()[0].status, TaskStatus::ToDo);
        let notices = list.app.snackbar.drain();
        assert_eq!(notices[0].message, "Failed to update task");
    }

    #[tokio::test]
    async fn initial_failure_then_retry() {
        let api = Arc::new(MemoryTaskApi::with_tasks(vec![task(1, "a", TaskStatus::ToDo)]));
        api.fail_next(1);
        let mut list = screen(&api);

        assert_eq!(list.on_focus().await, Outcome::Failed);
        assert_eq!(list.view(), ListView::Error(LOAD_ERROR_MESSAGE));

        assert_eq!(list.retry().await, Outcome::Done);
        assert_eq!(list.tasks().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_success_clears_the_flag() {
        let api = Arc::new(MemoryTaskApi::new());
        let mut list = screen(&api);
        list.on_focus().await;
        api.create_task(NewTaskRequest::new("late", None))
            .await
            .unwrap();

        assert_eq!(list.refresh().await, Outcome::Done);
        assert!(!list.is_refreshing());
        assert_eq!(list.tasks().unwrap()[0].title, "late");
    }

    #[tokio::test]
    async fn refresh_failure_keeps_rows() {
        let api = Arc::new(MemoryTaskApi::with_tasks(vec![task(1, "a", TaskStatus::ToDo)]));
        let mut list = screen(&api);
        list.on_focus().await;
        api.fail_next(1);

        assert_eq!(list.refresh().await, Outcome::Failed);
        assert!(!list.is_refreshing());
        assert_eq!(list.tasks().unwrap().len(), 1);
    }
}
