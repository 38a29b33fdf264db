use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use content_llm::LLMError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Error generating product content: {0}")]
    Upstream(#[from] LLMError),

    #[error("Model returned output that does not conform to contract: {0}")]
    SchemaViolation(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Validation(_) => "validation",
            GenerationError::Upstream(_) => "upstream",
            GenerationError::SchemaViolation(_) => "schema_violation",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::Validation(_) => StatusCode::BAD_REQUEST,
            GenerationError::Upstream(e) => match e {
                LLMError::MissingCredential | LLMError::Authentication(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                LLMError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                LLMError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                LLMError::Network(_) | LLMError::Api { .. } | LLMError::InvalidResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            GenerationError::SchemaViolation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(kind = self.kind(), status = status.as_u16(), "{}", self);
        }

        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
