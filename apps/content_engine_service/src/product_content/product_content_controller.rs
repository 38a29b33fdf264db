use axum::{
    extract::rejection::JsonRejection,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use tracing::Instrument;
use uuid::Uuid;

use super::product_content_schema::GenerationRequestBody;
use crate::{app_module::AppState, error::GenerationError};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn product_content_router() -> Router {
    Router::new().route("/generate", post(generate_product_content))
}

pub async fn generate_product_content(
    Extension(ctx): Extension<AppState>,
    payload: Result<Json<GenerationRequestBody>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id);

    let mut response = async move {
        let Json(body) = payload.map_err(|rejection| {
            GenerationError::Validation(format!(
                "malformed request body: {}",
                rejection.body_text()
            ))
        })?;
        let request = body.into_request()?;

        tracing::info!(
            title_chars = request.title().chars().count(),
            body_html_bytes = request.body_html().len(),
            "Generating product content"
        );

        let result = ctx
            .service
            .product_content_service
            .generate(&request)
            .await?;

        Ok::<_, GenerationError>(Json(result))
    }
    .instrument(span)
    .await
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
