use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

use crate::config::Environment;

/// Installs the global subscriber: pretty ANSI output in dev, JSON otherwise.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(environment: Environment) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    match environment {
        Environment::Dev => tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )?,
        Environment::Prod => tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )?,
    }

    Ok(())
}
