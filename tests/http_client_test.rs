mod support;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use tasklist::client::{HttpTaskApi, MemoryTaskApi, TaskApi};
use tasklist::config::ApiConfig;
use tasklist::error::AppError;
use tasklist::models::{NewTaskRequest, TaskStatus, UpdateTaskRequest};

fn client(base_url: &str) -> HttpTaskApi {
    HttpTaskApi::new(ApiConfig::new(base_url)).expect("Failed to build client")
}

#[tokio::test]
async fn test_create_omits_missing_description() {
    let (base_url, stub) = support::spawn(Arc::new(MemoryTaskApi::new())).await;
    let api = client(&base_url);

    let plain = api
        .create_task(NewTaskRequest::new("Buy milk", None))
        .await
        .expect("create without description");
    let described = api
        .create_task(NewTaskRequest::new("Call mum", Some("Sunday".to_string())))
        .await
        .expect("create with description");

    let bodies = stub.bodies();
    assert_eq!(bodies[0], json!({ "title": "Buy milk", "status": "to_do" }));
    assert_eq!(
        bodies[1],
        json!({ "title": "Call mum", "description": "Sunday", "status": "to_do" })
    );
    assert_eq!(plain.description, "");
    assert_eq!(described.description, "Sunday");
    assert_eq!(plain.status, TaskStatus::ToDo);
}

#[tokio::test]
async fn test_crud_roundtrip_over_http() {
    let (base_url, stub) = support::spawn(Arc::new(MemoryTaskApi::new())).await;
    let api = client(&base_url);

    let created = api
        .create_task(NewTaskRequest::new("Write report", None))
        .await
        .unwrap();
    let fetched = api.get_task(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let toggled = api
        .update_task(created.id, UpdateTaskRequest::status_only(TaskStatus::Done))
        .await
        .unwrap();
    assert_eq!(toggled.status, TaskStatus::Done);
    assert_eq!(toggled.title, "Write report");
    assert_eq!(stub.bodies().last(), Some(&json!({ "status": "done" })));

    let listed = api.list_tasks().await.unwrap();
    assert_eq!(listed, vec![toggled]);

    api.delete_task(created.id).await.unwrap();
    assert!(api.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_task_maps_to_not_found() {
    let (base_url, _stub) = support::spawn(Arc::new(MemoryTaskApi::new())).await;
    let api = client(&base_url);

    assert!(matches!(api.get_task(404).await, Err(AppError::NotFound)));
    assert!(matches!(api.delete_task(404).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let base_url = support::spawn_fixed(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let api = client(&base_url);

    match api.list_tasks().await {
        Err(AppError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_a_decode_error() {
    let base_url = support::spawn_fixed(StatusCode::OK, "<html>not json</html>").await;
    let api = client(&base_url);

    assert!(matches!(api.get_task(1).await, Err(AppError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&addr.to_string());
    assert!(matches!(api.list_tasks().await, Err(AppError::Http(_))));
}

#[tokio::test]
async fn test_cut_off_body_is_a_transport_error() {
    let base_url = support::spawn_truncated().await;
    let api = client(&base_url);

    assert!(matches!(api.list_tasks().await, Err(AppError::Http(_))));
}
