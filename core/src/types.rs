//! Wire DTOs for the task API.
//!
//! # Design
//! Field names follow the server's JSON exactly (`_id`, `Text`, `Date`,
//! `Done`, `UserId`, and `Id`, `UserName`, `Email` for the user). The mock
//! server defines its own copies; integration tests catch drift between the
//! two crates.

use serde::{Deserialize, Serialize};

/// A single task returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Done", default)]
    pub done: bool,
    #[serde(rename = "UserId")]
    pub user_id: String,
}

/// The user owning the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTask {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Date")]
    pub date: String,
}

/// Request payload for updating a task. Only the completion flag can change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTask {
    #[serde(rename = "Done")]
    pub done: bool,
}
