//! DTOs for the todo API as seen by a client.
//!
//! # Design
//! These mirror the server's wire shapes but are defined independently, so
//! the client never links against axum. The integration test catches schema
//! drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for `PUT /todos`. Subject and description are both replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

/// Cursor for `GET /todos`. `None` leaves the parameter off and lets the
/// server apply its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadTodos {
    pub prev_id: Option<i64>,
    pub size: Option<i64>,
}

impl ReadTodos {
    /// The cursor for the page after `page`, or `None` when `page` is empty.
    pub fn after(page: &[Todo], size: Option<i64>) -> Option<Self> {
        page.last().map(|last| Self {
            prev_id: Some(last.id),
            size,
        })
    }
}

/// Payload for `DELETE /todos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodos {
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodoPage {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Healthz {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
