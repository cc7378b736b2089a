pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{NewTaskRequest, Task, TaskId, UpdateTaskRequest};

pub use memory::MemoryTaskApi;

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn get_task(&self, id: TaskId) -> Result<Task, AppError>;
    async fn create_task(&self, req: NewTaskRequest) -> Result<Task, AppError>;
    async fn update_task(&self, id: TaskId, req: UpdateTaskRequest) -> Result<Task, AppError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), AppError>;
}

pub struct HttpTaskApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTaskApi {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.config.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.config.base_url, id)
    }

    async fn send(&self, label: &str, request: RequestBuilder) -> Result<String, AppError> {
        debug!("{}", label);
        let response = request.send().await.map_err(|e| {
            warn!("{} failed: {}", label, e);
            AppError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("{} body read failed: {}", label, e);
            AppError::Http(e)
        })?;

        if status == StatusCode::NOT_FOUND {
            warn!("{} -> 404", label);
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            warn!("{} -> {}: {}", label, status, body);
            return Err(AppError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let body = self.send(label, request).await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse response of {}: {}", label, e);
            AppError::Decode(e)
        })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.send_json("GET /tasks", self.client.get(self.tasks_url())).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, AppError> {
        let label = format!("GET /tasks/{}", id);
        self.send_json(&label, self.client.get(self.task_url(id))).await
    }

    async fn create_task(&self, req: NewTaskRequest) -> Result<Task, AppError> {
        self.send_json("POST /tasks", self.client.post(self.tasks_url()).json(&req)).await
    }

    async fn update_task(&self, id: TaskId, req: UpdateTaskRequest) -> Result<Task, AppError> {
        let label = format!("PUT /tasks/{}", id);
        self.send_json(&label, self.client.put(self.task_url(id)).json(&req)).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), AppError> {
        let label = format!("DELETE /tasks/{}", id);
        self.send(&label, self.client.delete(self.task_url(id)))
            .await
            .map(|_| ())
    }
}
