use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

const SERVICE_NAME: &str = "family-vault";

pub async fn root() -> &'static str {
    "Family Vault API is running"
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.documents.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "error": e.to_string()
            })),
        ),
    }
}

pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.documents.health_check().await.map_err(|e| {
        tracing::warn!("Readiness check failed: {}", e);
        AppError::ServiceUnavailable
    })?;
    Ok(StatusCode::OK)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
