//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Every successful call answers 200; the
//! payload is wrapped in a `{"todo": ..}` or `{"todos": [..]}` envelope that
//! the parse methods strip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateTodo, DeleteTodos, ErrorBody, Healthz, ReadTodos, Todo, TodoEnvelope, TodoPage,
    UpdateTodo,
};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.todos_url(), to_json(input)?))
    }

    pub fn build_read_todos(&self, cursor: &ReadTodos) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(prev_id) = cursor.prev_id {
            query.push(format!("prev_id={prev_id}"));
        }
        if let Some(size) = cursor.size {
            query.push(format!("size={size}"));
        }

        let mut path = self.todos_url();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        HttpRequest::bodiless(HttpMethod::Get, path)
    }

    pub fn build_update_todo(&self, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Put, self.todos_url(), to_json(input)?))
    }

    pub fn build_delete_todos(&self, ids: &[i64]) -> Result<HttpRequest, ApiError> {
        let body = to_json(&DeleteTodos { ids: ids.to_vec() })?;
        Ok(HttpRequest::json(HttpMethod::Delete, self.todos_url(), body))
    }

    pub fn build_healthz(&self) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, format!("{}/healthz", self.base_url))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        from_json::<TodoEnvelope>(&response.body).map(|e| e.todo)
    }

    pub fn parse_read_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        from_json::<TodoPage>(&response.body).map(|p| p.todos)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        from_json::<TodoEnvelope>(&response.body).map(|e| e.todo)
    }

    pub fn parse_delete_todos(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_healthz(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        from_json::<Healthz>(&response.body).map(|h| h.message)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-200 status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        400 => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|b| b.error)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::BadRequest(message))
        }
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
