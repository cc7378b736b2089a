#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use tasklist::client::{MemoryTaskApi, TaskApi};
use tasklist::error::AppError;
use tasklist::models::{NewTaskRequest, Task, TaskId, UpdateTaskRequest};

/// Task REST backend served over HTTP, backed by a `MemoryTaskApi`.
#[derive(Clone)]
pub struct StubState {
    pub store: Arc<MemoryTaskApi>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

impl StubState {
    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn record(&self, body: &Value) {
        self.bodies.lock().unwrap().push(body.clone());
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

struct StubError(AppError);

impl From<AppError> for StubError {
    fn from(err: AppError) -> Self {
        StubError(err)
    }
}

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::Status { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            AppError::Decode(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(state)
}

async fn list_tasks(State(state): State<StubState>) -> Result<Json<Vec<Task>>, StubError> {
    Ok(Json(state.store.list_tasks().await?))
}

async fn get_task(
    State(state): State<StubState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, StubError> {
    Ok(Json(state.store.get_task(id).await?))
}

async fn create_task(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Task>), StubError> {
    state.record(&body);
    let req: NewTaskRequest = serde_json::from_value(body).map_err(AppError::Decode)?;
    let task = state.store.create_task(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<StubState>,
    Path(id): Path<TaskId>,
    Json(body): Json<Value>,
) -> Result<Json<Task>, StubError> {
    state.record(&body);
    let req: UpdateTaskRequest = serde_json::from_value(body).map_err(AppError::Decode)?;
    Ok(Json(state.store.update_task(id, req).await?))
}

async fn delete_task(
    State(state): State<StubState>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, StubError> {
    state.store.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server crashed");
    });
    format!("http://{}", addr)
}

/// Serves the task API on an ephemeral port and returns its base URL.
pub async fn spawn(store: Arc<MemoryTaskApi>) -> (String, StubState) {
    let state = StubState {
        store,
        bodies: Arc::new(Mutex::new(Vec::new())),
    };
    let base_url = serve(router(state.clone())).await;
    (base_url, state)
}

/// Answers every request with the same status and raw body.
pub async fn spawn_fixed(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().fallback(move || async move { (status, body) });
    serve(app).await
}

/// Promises a longer body than it sends, then closes the connection.
pub async fn spawn_truncated() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind truncating server");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n[{\"id\":1")
                .await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}", addr)
}
