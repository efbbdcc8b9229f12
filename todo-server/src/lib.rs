//! HTTP service for a single `/todos` resource.
//!
//! # Overview
//! `POST`, `GET`, `PUT` and `DELETE` on `/todos` create, page through,
//! update and bulk-delete todo items held by a [`TodoStore`]. Reads are
//! cursor-based: the caller passes the last id it saw as `prev_id`.
//! `GET /healthz` answers a static liveness payload.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handler;
pub mod healthz;
pub mod memory;
pub mod model;
pub mod store;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::ApiError;
pub use memory::MemoryStore;
pub use model::Todo;
pub use store::{StoreError, TodoStore};

/// State shared by every request. Holds no mutable data of its own.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub store_timeout: Duration,
    pub max_page_size: usize,
}

impl AppState {
    /// A zero `max_page_size` is raised to 1 so reads always make progress.
    pub fn new(store: Arc<dyn TodoStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            store_timeout: config.store_timeout,
            max_page_size: config.max_page_size.max(1),
        }
    }
}

/// Router backed by a fresh in-memory store and default settings.
pub fn app() -> Router {
    router(AppState::new(
        Arc::new(MemoryStore::new()),
        &ServerConfig::default(),
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/todos", any(handler::todos))
        .route("/healthz", get(healthz::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}
