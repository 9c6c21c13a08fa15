use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskboard_core::{Category, HttpTaskApi, NewTask, Operation, TaskApi, TaskId, TaskStatus};

#[derive(Clone, Default)]
struct Recorded {
    list_queries: Arc<Mutex<Vec<Option<String>>>>,
    create_bodies: Arc<Mutex<Vec<Value>>>,
    completed: Arc<Mutex<Vec<String>>>,
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}/api", addr)
}

fn task_json(id: u64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "from server",
        "category": "urgent",
        "status": status,
        "deadline": "2024-01-01T10:00:00Z",
        "created_at": "2023-12-31T08:00:00Z",
        "updated_at": "2023-12-31T08:00:00Z"
    })
}

async fn list(
    State(recorded): State<Recorded>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let status = params.get("status").cloned();
    recorded.list_queries.lock().unwrap().push(status.clone());
    let tasks = vec![
        task_json(1, "Water plants", "pending"),
        task_json(2, "File taxes", "completed"),
    ];
    let filtered: Vec<Value> = tasks
        .into_iter()
        .filter(|task| status.as_deref().map_or(true, |s| task["status"] == s))
        .collect();
    Json(Value::Array(filtered))
}

async fn create(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    recorded.create_bodies.lock().unwrap().push(body.clone());
    let mut task = task_json(3, body["title"].as_str().unwrap_or_default(), "pending");
    task["description"] = body["description"].clone();
    task["category"] = body["category"].clone();
    task["deadline"] = body["deadline"].clone();
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn done(State(recorded): State<Recorded>, Path(id): Path<String>) -> Json<Value> {
    recorded.completed.lock().unwrap().push(id);
    Json(json!({ "status": "Task completed successfully!" }))
}

async fn remove(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "7" => StatusCode::NO_CONTENT.into_response(),
        "8" => (StatusCode::OK, Json(json!({ "deleted": true }))).into_response(),
        "9" => (StatusCode::OK, "gone").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn task_router(recorded: Recorded) -> Router {
    Router::new()
        .route("/api/tasks/", get(list).post(create))
        .route("/api/tasks/:id/done/", patch(done))
        .route("/api/tasks/:id/", delete(remove))
        .with_state(recorded)
}

async fn api_with_server() -> (HttpTaskApi, Recorded) {
    let recorded = Recorded::default();
    let base = serve(task_router(recorded.clone())).await;
    (HttpTaskApi::new(&base).expect("api"), recorded)
}

#[tokio::test]
async fn list_sends_status_query_only_when_filtered() {
    let (api, recorded) = api_with_server().await;

    let all = api.list_tasks(None).await.expect("list all");
    let pending = api
        .list_tasks(Some(TaskStatus::Pending))
        .await
        .expect("list pending");

    assert_eq!(all.as_array().map(Vec::len), Some(2));
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(
        *recorded.list_queries.lock().unwrap(),
        vec![None, Some("pending".to_string())]
    );
}

#[tokio::test]
async fn create_posts_the_draft_and_returns_the_server_task() {
    let (api, recorded) = api_with_server().await;
    let draft = NewTask {
        title: "Buy milk".into(),
        description: "2%".into(),
        category: Category::Urgent,
        deadline: "2024-01-01T10:00".into(),
    };

    let created = api.create_task(&draft).await.expect("create");

    assert_eq!(created.id, TaskId::new("3"));
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.status, TaskStatus::Pending);
    assert!(created.created_at.is_some());
    assert_eq!(
        recorded.create_bodies.lock().unwrap()[0],
        json!({
            "title": "Buy milk",
            "description": "2%",
            "category": "urgent",
            "deadline": "2024-01-01T10:00"
        })
    );
}

#[tokio::test]
async fn complete_patches_the_done_endpoint() {
    let (api, recorded) = api_with_server().await;

    let body = api
        .complete_task(&TaskId::new("5"))
        .await
        .expect("complete");

    assert_eq!(body["status"], "Task completed successfully!");
    assert_eq!(*recorded.completed.lock().unwrap(), vec!["5".to_string()]);
}

#[tokio::test]
async fn delete_accepts_no_content_and_json_bodies() {
    let (api, _recorded) = api_with_server().await;

    assert!(api.delete_task(&TaskId::new("7")).await.expect("204"));
    assert!(api.delete_task(&TaskId::new("8")).await.expect("200 json"));
}

#[tokio::test]
async fn delete_rejects_non_json_success_bodies() {
    let (api, _recorded) = api_with_server().await;

    let err = api
        .delete_task(&TaskId::new("9"))
        .await
        .expect_err("plain text body");

    assert_eq!(err.operation(), Operation::Delete);
    assert!(err.to_string().starts_with("Error deleting task: "));
    assert!(
        err.cause().contains("expected value"),
        "decode cause missing: {}",
        err
    );
}

#[tokio::test]
async fn error_statuses_become_request_errors() {
    let (api, _recorded) = api_with_server().await;

    let err = api
        .delete_task(&TaskId::new("404"))
        .await
        .expect_err("missing task");

    assert_eq!(err.http_status(), Some(404));
    assert_eq!(err.to_string(), "Error deleting task: HTTP 404");
}

#[tokio::test]
async fn server_errors_on_list_are_wrapped() {
    let router = Router::new().route(
        "/api/tasks/",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let api = HttpTaskApi::new(&serve(router).await).expect("api");

    let err = api.list_tasks(None).await.expect_err("500");

    assert_eq!(err.to_string(), "Error listing tasks: HTTP 500");
}

#[tokio::test]
async fn non_array_list_bodies_are_returned_untouched() {
    let router = Router::new().route(
        "/api/tasks/",
        get(|| async { Json(json!({ "detail": "maintenance" })) }),
    );
    let api = HttpTaskApi::new(&serve(router).await).expect("api");

    let body = api.list_tasks(None).await.expect("list");

    assert_eq!(body, json!({ "detail": "maintenance" }));
}

#[tokio::test]
async fn connection_failures_are_wrapped_without_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = HttpTaskApi::new(&format!("http://{}/api", addr)).expect("api");

    let err = api
        .create_task(&NewTask {
            title: "t".into(),
            description: "d".into(),
            category: Category::Later,
            deadline: "2024-01-01T10:00".into(),
        })
        .await
        .expect_err("refused");

    assert_eq!(err.http_status(), None);
    assert!(err.to_string().starts_with("Error creating task: "));
    assert!(
        err.cause().to_lowercase().contains("refused"),
        "refusal reason missing: {}",
        err
    );
}
