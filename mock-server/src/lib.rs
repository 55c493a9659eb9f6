use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "it210_session";

/// Cookie value `app()` accepts out of the box.
pub const DEFAULT_SESSION: &str = "test-session";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Done")]
    pub done: bool,
    #[serde(rename = "UserId")]
    pub user_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateTask {
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    #[serde(rename = "Done")]
    pub done: Option<bool>,
}

/// Sessions and tasks. Every task belongs to exactly one user.
#[derive(Debug, Default)]
pub struct Store {
    sessions: HashMap<String, User>,
    tasks: HashMap<String, Task>,
}

impl Store {
    /// Accept `cookie` as a session for `user`.
    pub fn with_session(mut self, cookie: &str, user: User) -> Self {
        self.sessions.insert(cookie.to_string(), user);
        self
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn default_user() -> User {
    User {
        id: "000000000000000000000001".to_string(),
        user_name: "tester".to_string(),
        email: "tester@example.com".to_string(),
    }
}

/// Router seeded with `DEFAULT_SESSION` for `default_user()`.
pub fn app() -> Router {
    router(Store::default().with_session(DEFAULT_SESSION, default_user()))
}

pub fn router(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/v1/user", get(current_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock task API listening");
    }
    axum::serve(listener, app).await
}

/// Failures, with the status codes the real service answers with.
///
/// A malformed id and a create without data both surface as 500, matching
/// the service's unhandled-exception behavior.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("not logged in")]
    Unauthorized,
    #[error("task not found")]
    NotFound,
    #[error("Cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),
    #[error("Text and Date are required")]
    MissingFields,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::InvalidId(_) | ServerError::MissingFields => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        debug!(error = %self, "request rejected");
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// The user behind the request's session cookie.
pub struct CurrentUser(pub User);

impl FromRequestParts<Db> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let session = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_from_cookie_header)
            .filter(|value| !value.is_empty())
            .ok_or(ServerError::Unauthorized)?;

        let store = db.read().await;
        store
            .sessions
            .get(session)
            .cloned()
            .map(CurrentUser)
            .ok_or(ServerError::Unauthorized)
    }
}

/// Value of the session cookie in a `Cookie` header, if present.
pub fn session_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// Ids are 24 hex characters, like a MongoDB ObjectId.
pub fn is_object_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn new_object_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

fn check_id(id: &str) -> Result<(), ServerError> {
    if is_object_id(id) {
        Ok(())
    } else {
        Err(ServerError::InvalidId(id.to_string()))
    }
}

async fn list_tasks(State(db): State<Db>, CurrentUser(user): CurrentUser) -> Json<Vec<Task>> {
    let store = db.read().await;
    let tasks = store
        .tasks
        .values()
        .filter(|task| task.user_id == user.id)
        .cloned()
        .collect();
    Json(tasks)
}

async fn create_task(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    let text = input.text.filter(|t| !t.is_empty());
    let date = input.date.filter(|d| !d.is_empty());
    let (Some(text), Some(date)) = (text, date) else {
        return Err(ServerError::MissingFields);
    };

    let task = Task {
        id: new_object_id(),
        text,
        date,
        done: false,
        user_id: user.id,
    };
    debug!(id = %task.id, "task created");
    db.write().await.tasks.insert(task.id.clone(), task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    check_id(&id)?;
    let store = db.read().await;
    store
        .tasks
        .get(&id)
        .filter(|task| task.user_id == user.id)
        .cloned()
        .map(Json)
        .ok_or(ServerError::NotFound)
}

async fn update_task(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Task>, ServerError> {
    check_id(&id)?;
    let mut store = db.write().await;
    let task = store
        .tasks
        .get_mut(&id)
        .filter(|task| task.user_id == user.id)
        .ok_or(ServerError::NotFound)?;
    if let Some(done) = input.done {
        task.done = done;
    }
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    check_id(&id)?;
    let mut store = db.write().await;
    let owned = store
        .tasks
        .get(&id)
        .is_some_and(|task| task.user_id == user.id);
    if !owned {
        return Err(ServerError::NotFound);
    }
    store
        .tasks
        .remove(&id)
        .map(Json)
        .ok_or(ServerError::NotFound)
}

async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
