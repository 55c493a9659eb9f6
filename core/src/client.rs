//! Stateless request builder and sender for the task API.
//!
//! # Design
//! `TaskClient` holds only a `base_url` and a transport, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and an async method that sends it
//! through the transport. The response comes back untouched: a 404 or 500
//! is an `Ok` value, and only a request that never completed is an `Err`.

use reqwest::Url;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::transport::ReqwestTransport;
use crate::types::{CreateTask, UpdateTask};

/// Name of the session cookie the server authenticates with.
pub const SESSION_COOKIE: &str = "it210_session";

const TASKS_PATH: &str = "/api/v1/tasks";
const USER_PATH: &str = "/api/v1/user";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Asynchronous, stateless client for the task API.
///
/// The session cookie value is passed to every call; the client never stores
/// it. Task identifiers are opaque and go into the URL path verbatim.
///
/// API paths are absolute, so they are resolved against the base URL's
/// origin: any path or query string on the base is replaced.
#[derive(Debug, Clone)]
pub struct TaskClient<T = ReqwestTransport> {
    base_url: Url,
    transport: T,
}

impl TaskClient<ReqwestTransport> {
    /// Client using a default `reqwest` transport.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(base_url, ReqwestTransport::new())
    }
}

impl<T: Transport> TaskClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: cannot resolve paths against this URL"
            )));
        }
        Ok(Self {
            base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_create_task(
        &self,
        cookie: &str,
        input: &CreateTask,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.resolve(TASKS_PATH)?,
            headers: json_headers(cookie),
            body: Some(body),
        })
    }

    pub fn build_read_all_tasks(&self, cookie: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(TASKS_PATH)?,
            headers: cookie_headers(cookie),
            body: None,
        })
    }

    pub fn build_read_task(&self, cookie: &str, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.task_url(id)?,
            headers: cookie_headers(cookie),
            body: None,
        })
    }

    pub fn build_update_task(
        &self,
        cookie: &str,
        id: &str,
        input: &UpdateTask,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.task_url(id)?,
            headers: json_headers(cookie),
            body: Some(body),
        })
    }

    pub fn build_delete_task(&self, cookie: &str, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.task_url(id)?,
            headers: cookie_headers(cookie),
            body: None,
        })
    }

    pub fn build_read_current_user(&self, cookie: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(USER_PATH)?,
            headers: cookie_headers(cookie),
            body: None,
        })
    }

    /// POST a new task. The server assigns the id and sets `Done` to false.
    pub async fn create_task(
        &self,
        cookie: &str,
        text: &str,
        date: &str,
    ) -> Result<HttpResponse, ApiError> {
        let input = CreateTask {
            text: text.to_string(),
            date: date.to_string(),
        };
        let request = self.build_create_task(cookie, &input)?;
        self.execute(request).await
    }

    /// GET every task owned by the session's user.
    pub async fn read_all_tasks(&self, cookie: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_read_all_tasks(cookie)?).await
    }

    pub async fn read_task(&self, cookie: &str, id: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_read_task(cookie, id)?).await
    }

    /// PUT a new completion flag on task `id`.
    pub async fn update_task(
        &self,
        cookie: &str,
        id: &str,
        done: bool,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_update_task(cookie, id, &UpdateTask { done })?;
        self.execute(request).await
    }

    pub async fn delete_task(&self, cookie: &str, id: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_delete_task(cookie, id)?).await
    }

    /// GET the user the session cookie belongs to.
    pub async fn read_current_user(&self, cookie: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_read_current_user(cookie)?).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        debug!(method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        debug!(method, status = response.status, ok = response.ok(), "request finished");
        Ok(response)
    }

    fn task_url(&self, id: &str) -> Result<String, ApiError> {
        self.resolve(&format!("{TASKS_PATH}/{id}"))
    }

    fn resolve(&self, path: &str) -> Result<String, ApiError> {
        self.base_url
            .join(path)
            .map(String::from)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }
}

fn cookie_headers(cookie: &str) -> Vec<(String, String)> {
    vec![("cookie".to_string(), format!("{SESSION_COOKIE}={cookie}"))]
}

fn json_headers(cookie: &str) -> Vec<(String, String)> {
    let mut headers = vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())];
    headers.extend(cookie_headers(cookie));
    headers
}
