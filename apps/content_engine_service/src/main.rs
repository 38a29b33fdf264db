use anyhow::Context;
use content_engine_service::{
    app_module::AppState, app_router::build_app, config::AppConfig, telemetry::init_tracing,
};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.environment)?;

    if !config.has_credential() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; /generate will fail until it is configured");
    }

    tracing::info!(
        model = %config.anthropic.model,
        origins = ?config.allowed_origins,
        "Starting product content service"
    );

    let (host, port) = (config.host.clone(), config.port);
    let state = AppState::new(config)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("unable to bind {}:{}", host, port))?;

    tracing::info!("Server started, listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
