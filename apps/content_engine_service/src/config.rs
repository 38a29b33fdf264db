use std::{env, time::Duration};

use axum::http::HeaderValue;
use content_llm::{
    anthropic::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL},
    AnthropicConfig, LLMClientConfig,
};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEV_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub anthropic: AnthropicConfig,
    pub llm_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = match get("APP_ENVIRONMENT").as_deref() {
            None | Some("dev") => Environment::Dev,
            Some(_) => Environment::Prod,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = match (get("CORS_ORIGINS"), environment) {
            (Some(raw), _) => parse_origins(&raw)?,
            (None, Environment::Dev) => parse_origins(DEV_CORS_ORIGINS)?,
            (None, Environment::Prod) => AllowedOrigins::Any,
        };

        let max_tokens = match get("LLM_MAX_TOKENS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
                key: "LLM_MAX_TOKENS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let llm_timeout = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::Invalid {
                    key: "LLM_TIMEOUT_SECS",
                    reason: e.to_string(),
                }
            })?)),
            None => None,
        };

        let anthropic = AnthropicConfig {
            api_key: get("ANTHROPIC_API_KEY"),
            base_url: get("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            ..AnthropicConfig::default()
        };

        Ok(Self {
            environment,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            allowed_origins,
            anthropic,
            llm_timeout,
        })
    }

    /// Host and port for `TcpListener::bind`. The host may be a name such as
    /// `localhost`; it is resolved at bind time.
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn has_credential(&self) -> bool {
        self.anthropic.api_key.is_some()
    }

    pub fn llm_client_config(&self) -> LLMClientConfig {
        LLMClientConfig {
            timeout: self.llm_timeout,
        }
    }
}

fn parse_origins(raw: &str) -> Result<AllowedOrigins, ConfigError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return Ok(AllowedOrigins::Any);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                reason: format!("{}: {}", origin, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowedOrigins::List)
}
