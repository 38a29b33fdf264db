use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    app_module::AppState,
    config::AllowedOrigins,
    health::health_controller,
    product_content::product_content_controller::product_content_router,
};

pub fn application_router() -> Router {
    Router::new()
        .route("/", get(health_controller::health))
        .merge(product_content_router())
}

/// Router with tracing, shared state and CORS applied.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    application_router().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(state))
            .layer(cors)
            .into_inner(),
    )
}

pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    match origins {
        AllowedOrigins::Any => CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        // Credentials rule out wildcards, so methods and headers are mirrored.
        AllowedOrigins::List(list) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(list.iter().cloned()))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    }
}
