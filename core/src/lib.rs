//! Asynchronous client for the task management API.
//!
//! # Overview
//! Issues the six requests the API offers (create, list, read, update and
//! delete a task, and read the current user), each authenticated with the
//! caller's session cookie. Responses are handed back unmodified; the caller
//! decides what a status code means and when to parse the body.
//!
//! # Design
//! - `TaskClient` is stateless: it holds a base URL and a transport.
//! - Each operation has a `build_*` method producing plain request data and
//!   an async method that sends it, so request shape is testable without I/O.
//! - The network sits behind the [`Transport`] trait. [`ReqwestTransport`] is
//!   the production implementation; tests substitute their own.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{TaskClient, SESSION_COOKIE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::ReqwestTransport;
pub use types::{CreateTask, Task, UpdateTask, User};
