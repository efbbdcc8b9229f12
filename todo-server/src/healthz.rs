//! Static liveness endpoint.

use axum::Json;

use crate::model::HealthzResponse;

/// Liveness probe. Never touches the store.
pub async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse {
        message: "OK".to_string(),
    })
}
