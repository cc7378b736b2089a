use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::TaskApi;
use crate::error::AppError;
use crate::models::{NewTaskRequest, Task, TaskId, TaskStatus, UpdateTaskRequest};

/// In-process task backend with the same semantics as the REST server.
///
/// Every call is appended to a request log (`"GET /tasks"`, `"PUT /tasks/3"`, ...)
/// holding the last [`REQUEST_LOG_LIMIT`] entries, and failures or latency can
/// be injected.
pub const REQUEST_LOG_LIMIT: usize = 256;

pub struct MemoryTaskApi {
    store: Mutex<Store>,
    latency: Option<Duration>,
}

#[derive(Default)]
struct Store {
    tasks: Vec<Task>,
    next_id: TaskId,
    timestamp: Option<String>,
    pending_failures: usize,
    requests: VecDeque<String>,
}

impl Default for MemoryTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTaskApi {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                next_id: 1,
                ..Store::default()
            }),
            latency: None,
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            store: Mutex::new(Store {
                tasks,
                next_id,
                ..Store::default()
            }),
            latency: None,
        }
    }

    /// Id handed to the next created task.
    pub fn starting_at(self, next_id: TaskId) -> Self {
        self.lock().next_id = next_id;
        self
    }

    /// Pins `created_at` for new tasks instead of using the clock.
    pub fn with_timestamp(self, timestamp: impl Into<String>) -> Self {
        self.lock().timestamp = Some(timestamp.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The next `count` requests fail with a 503.
    pub fn fail_next(&self, count: usize) {
        self.lock().pending_failures = count;
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.iter().cloned().collect()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A poisoned store only means a test panicked mid-call; the data is still usable.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn begin(&self, request: String) -> Result<(), AppError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut store = self.lock();
        if store.requests.len() == REQUEST_LOG_LIMIT {
            store.requests.pop_front();
        }
        store.requests.push_back(request);
        if store.pending_failures > 0 {
            store.pending_failures -= 1;
            return Err(AppError::Status {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Store {
    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, AppError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound)
    }

    fn now(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

#[async_trait]
impl TaskApi for MemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.begin("GET /tasks".to_string()).await?;
        let store = self.lock();
        Ok(store.tasks.clone())
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, AppError> {
        self.begin(format!("GET /tasks/{}", id)).await?;
        let mut store = self.lock();
        store.find_mut(id).map(|t| t.clone())
    }

    async fn create_task(&self, req: NewTaskRequest) -> Result<Task, AppError> {
        self.begin("POST /tasks".to_string()).await?;
        let mut store = self.lock();
        if req.title.trim().is_empty() {
            return Err(AppError::Status {
                status: 400,
                message: "title is required".to_string(),
            });
        }

        let task = Task {
            id: store.next_id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            status: TaskStatus::ToDo,
            created_at: store.now(),
        };
        store.next_id += 1;
        store.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, req: UpdateTaskRequest) -> Result<Task, AppError> {
        self.begin(format!("PUT /tasks/{}", id)).await?;
        let mut store = self.lock();
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::Status {
                status: 400,
                message: "title must not be empty".to_string(),
            });
        }

        let task = store.find_mut(id)?;
        req.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), AppError> {
        self.begin(format!("DELETE /tasks/{}", id)).await?;
        let mut store = self.lock();
        let before = store.tasks.len();
        store.tasks.retain(|t| t.id != id);
        if store.tasks.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
