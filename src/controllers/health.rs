use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::video::VideoServiceApi;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(
    State(video_service): State<Arc<dyn VideoServiceApi>>,
) -> impl IntoResponse {
    if video_service.encoder_available() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "encoder": "available"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "encoder": "missing"
            })),
        )
    }
}
