use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Product Content Generator API",
            "status": "running",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339(),
            "endpoints": {
                "generate": "/generate (POST)",
                "health": "/ (GET)"
            }
        })),
    )
}
