//! Persistence contract consumed by the request handler.
//!
//! # Design
//! The handler only ever talks to `dyn TodoStore`. Failures come back as a
//! tagged `StoreError` so the handler can map kinds to statuses by matching
//! variants. A missing row on update is reported as `Ok(None)`; missing rows
//! on delete are reported as `StoreError::NotFound` listing the absent ids.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Todo;

/// Errors reported by a `TodoStore` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// One or more addressed todos do not exist.
    #[error("todos not found: {ids:?}")]
    NotFound {
        /// The ids that were absent.
        ids: Vec<i64>,
    },

    /// The store did not answer within the configured deadline.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other persistence failure.
    #[error("store failure: {0}")]
    Backend(String),
}

/// Create / read-page / update / delete over todo items.
///
/// Implementations own id assignment and timestamps, and must be safe to call
/// from many request tasks at once.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persists a new todo and returns it with its assigned id and timestamps.
    async fn create(&self, subject: &str, description: &str) -> Result<Todo, StoreError>;

    /// Returns up to `size` todos with `id > prev_id`, ascending by id.
    async fn read_page(&self, prev_id: i64, size: usize) -> Result<Vec<Todo>, StoreError>;

    /// Replaces subject and description. `Ok(None)` when `id` does not exist.
    async fn update(
        &self,
        id: i64,
        subject: &str,
        description: &str,
    ) -> Result<Option<Todo>, StoreError>;

    /// Removes every todo in `ids`, or none of them if any id is missing.
    async fn delete(&self, ids: &[i64]) -> Result<(), StoreError>;
}
