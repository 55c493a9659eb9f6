use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, default_user, router, Store, Task, User, DEFAULT_SESSION};
use tower::ServiceExt;

const FAKE_ID: &str = "123456789012345678901234";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn cookie(session: &str) -> String {
    format!("it210_session={session}")
}

fn request(method: &str, uri: &str, session: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::COOKIE, cookie(session))
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, session: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::COOKIE, cookie(session))
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn list_tasks_without_cookie_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/tasks")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_tasks_with_empty_cookie_is_401() {
    let resp = app()
        .oneshot(request("GET", "/api/v1/tasks", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_session_is_401() {
    let resp = app()
        .oneshot(request("GET", "/api/v1/user", "not-a-session"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].is_string());
}

// --- user ---

#[tokio::test]
async fn current_user_returns_session_owner() {
    let resp = app()
        .oneshot(request("GET", "/api/v1/user", DEFAULT_SESSION))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user, default_user());
}

// --- list ---

#[tokio::test]
async fn list_tasks_empty() {
    let resp = app()
        .oneshot(request("GET", "/api/v1/tasks", DEFAULT_SESSION))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_task_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            DEFAULT_SESSION,
            r#"{"Text":"Buy milk","Date":"2023-01-01"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: Task = body_json(resp).await;
    assert_eq!(task.text, "Buy milk");
    assert_eq!(task.date, "2023-01-01");
    assert!(!task.done);
    assert_eq!(task.user_id, default_user().id);
    assert_eq!(task.id.len(), 24);
}

#[tokio::test]
async fn create_task_with_empty_fields_is_500() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            DEFAULT_SESSION,
            r#"{"Text":"","Date":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn create_task_missing_date_is_500() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            DEFAULT_SESSION,
            r#"{"Text":"No date"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- get ---

#[tokio::test]
async fn get_task_not_found() {
    let resp = app()
        .oneshot(request("GET", &format!("/api/v1/tasks/{FAKE_ID}"), DEFAULT_SESSION))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_task_malformed_id_is_500() {
    let resp = app()
        .oneshot(request("GET", "/api/v1/tasks/not-an-id", DEFAULT_SESSION))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- update ---

#[tokio::test]
async fn update_task_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/tasks/{FAKE_ID}"),
            DEFAULT_SESSION,
            r#"{"Done":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_task_not_found() {
    let resp = app()
        .oneshot(request(
            "DELETE",
            &format!("/api/v1/tasks/{FAKE_ID}"),
            DEFAULT_SESSION,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_task_malformed_id_is_500() {
    let resp = app()
        .oneshot(request(
            "DELETE",
            "/api/v1/tasks/fake-id-invalid",
            DEFAULT_SESSION,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- ownership ---

#[tokio::test]
async fn tasks_are_scoped_to_their_owner() {
    use tower::Service;

    let other = User {
        id: "000000000000000000000002".to_string(),
        user_name: "other".to_string(),
        email: "other@example.com".to_string(),
    };
    let store = Store::default()
        .with_session("alice", default_user())
        .with_session("bob", other);
    let mut app = router(store).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            "alice",
            r#"{"Text":"Private","Date":"2024-02-02"}"#,
        ))
        .await
        .unwrap();
    let created: Task = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/api/v1/tasks", "bob"))
        .await
        .unwrap();
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/api/v1/tasks/{}", created.id), "bob"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/api/v1/tasks/{}", created.id), "bob"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/api/v1/tasks/{}", created.id), "alice"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            DEFAULT_SESSION,
            r#"{"Text":"Walk dog","Date":"2024-05-01"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = body_json(resp).await;
    let id = created.id.clone();

    // list: should contain the one task
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/api/v1/tasks", DEFAULT_SESSION))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = body_json(resp).await;
    assert_eq!(tasks, vec![created.clone()]);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/api/v1/tasks/{id}"), DEFAULT_SESSION))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Task = body_json(resp).await;
    assert_eq!(fetched, created);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/tasks/{id}"),
            DEFAULT_SESSION,
            r#"{"Done":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = body_json(resp).await;
    assert_eq!(updated.text, "Walk dog"); // unchanged
    assert!(updated.done);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/api/v1/tasks/{id}"), DEFAULT_SESSION))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Task = body_json(resp).await;
    assert_eq!(deleted.id, id);

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/api/v1/tasks/{id}"), DEFAULT_SESSION))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/api/v1/tasks", DEFAULT_SESSION))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = body_json(resp).await;
    assert!(tasks.is_empty());
}
