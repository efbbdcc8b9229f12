//! Request handler for the `/todos` resource.
//!
//! # Design
//! One axum handler serves every method on `/todos`. The method is turned
//! into a closed `Operation` and exactly one branch runs. Each branch decodes
//! and validates before touching the store, so a rejected request never
//! mutates anything. Every store call is bounded by the configured timeout;
//! if the client disconnects, axum drops this future and the store call with
//! it.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::model::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse,
    ReadTodoRequest, ReadTodoResponse, UpdateTodoRequest, UpdateTodoResponse,
};
use crate::store::StoreError;
use crate::AppState;

/// Page size used when `size` is absent, unparseable or zero.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// The operation selected by the request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Unsupported,
}

impl From<&Method> for Operation {
    fn from(method: &Method) -> Self {
        match method {
            &Method::POST => Operation::Create,
            &Method::GET => Operation::Read,
            &Method::PUT => Operation::Update,
            &Method::DELETE => Operation::Delete,
            _ => Operation::Unsupported,
        }
    }
}

pub async fn todos(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    match Operation::from(&method) {
        Operation::Create => create(&state, &body).await.map(IntoResponse::into_response),
        Operation::Read => read(&state, &params).await.map(IntoResponse::into_response),
        Operation::Update => update(&state, &body).await.map(IntoResponse::into_response),
        Operation::Delete => delete(&state, &body).await.map(IntoResponse::into_response),
        Operation::Unsupported => Err(ApiError::MethodNotAllowed(method)),
    }
}

async fn create(state: &AppState, body: &[u8]) -> Result<Json<CreateTodoResponse>, ApiError> {
    let input: CreateTodoRequest = decode(body)?;
    require_subject(&input.subject)?;

    let todo = bounded(
        state.store_timeout,
        state.store.create(&input.subject, &input.description),
    )
    .await?;

    tracing::info!(id = todo.id, "todo created");
    Ok(Json(CreateTodoResponse { todo }))
}

async fn read(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Json<ReadTodoResponse>, ApiError> {
    let request = parse_read_request(params)?;
    let size = usize::try_from(request.size)
        .unwrap_or(usize::MAX)
        .min(state.max_page_size);

    let todos = bounded(
        state.store_timeout,
        state.store.read_page(request.prev_id, size),
    )
    .await?;

    tracing::debug!(prev_id = request.prev_id, size, returned = todos.len(), "todos read");
    Ok(Json(ReadTodoResponse { todos }))
}

async fn update(state: &AppState, body: &[u8]) -> Result<Json<UpdateTodoResponse>, ApiError> {
    let input: UpdateTodoRequest = decode(body)?;
    require_subject(&input.subject)?;
    if input.id <= 0 {
        return Err(ApiError::Validation(format!("invalid todo id {}", input.id)));
    }

    let todo = bounded(
        state.store_timeout,
        state
            .store
            .update(input.id, &input.subject, &input.description),
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    tracing::info!(id = todo.id, "todo updated");
    Ok(Json(UpdateTodoResponse { todo }))
}

async fn delete(state: &AppState, body: &[u8]) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let input: DeleteTodoRequest = decode(body)?;
    if input.ids.is_empty() {
        return Err(ApiError::Validation("ids must not be empty".to_string()));
    }
    let ids: Vec<i64> = input.ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

    bounded(state.store_timeout, state.store.delete(&ids)).await?;

    tracing::info!(?ids, "todos deleted");
    Ok(Json(DeleteTodoResponse {}))
}

/// Resolves the cursor and page size from the query string.
///
/// Absent or unparseable values fall back to defaults: `prev_id` to 0 and
/// `size` to [`DEFAULT_PAGE_SIZE`]. A negative `size` is rejected.
pub fn parse_read_request(params: &HashMap<String, String>) -> Result<ReadTodoRequest, ApiError> {
    let parse = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0)
    };

    let prev_id = parse("prev_id");
    let size = match parse("size") {
        0 => DEFAULT_PAGE_SIZE,
        n if n < 0 => {
            return Err(ApiError::Validation(format!(
                "size must not be negative, got {n}"
            )))
        }
        n => n,
    };

    Ok(ReadTodoRequest { prev_id, size })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

fn require_subject(subject: &str) -> Result<(), ApiError> {
    if subject.trim().is_empty() {
        return Err(ApiError::Validation("subject must not be empty".to_string()));
    }
    Ok(())
}

async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}
