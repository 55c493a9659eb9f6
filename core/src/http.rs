//! HTTP request/response values and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `TaskClient` builds `HttpRequest`
//! values and hands them to a [`Transport`], which performs the actual I/O
//! and returns an `HttpResponse`. Swapping the transport is how unit tests
//! run without a network.
//!
//! A response is returned to the caller as-is. Status interpretation and
//! body parsing happen only when the caller asks for them through
//! [`HttpResponse::ok`], [`HttpResponse::json`] or
//! [`HttpResponse::error_for_status`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TaskClient::build_*` methods and executed by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// `true` for any 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parse the body as JSON into `T`.
    ///
    /// Status is not checked; a 404 body parses just as well as a 200 body
    /// if it happens to match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(ApiError::Deserialization)
    }

    /// Map non-success status codes to the matching `ApiError` variant.
    ///
    /// The client never calls this itself; it is for callers that prefer
    /// `?` over inspecting [`HttpResponse::ok`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        match self.status {
            _ if self.ok() => Ok(self),
            401 => Err(ApiError::Unauthorized),
            404 => Err(ApiError::NotFound),
            status => Err(ApiError::Http {
                status,
                body: self.body,
            }),
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes an `HttpRequest` and returns the response.
///
/// Implementations must return `Ok` for every response the server actually
/// sent, whatever its status. `Err` is reserved for requests that could not
/// be completed at all.
///
/// `send` resolves once the whole body has been read, not when the headers
/// arrive. A connection lost partway through the body is therefore an `Err`
/// from `send`; [`HttpResponse::json`] only ever sees a complete body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}
