use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

pub mod anthropic;

pub use anthropic::{AnthropicConfig, AnthropicService};

/// Instruction payload sent to a model: a system framing plus a single user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Full payload as a single string, system part first.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }

    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.user.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Model credential is not configured")]
    MissingCredential,

    #[error("Model provider rejected the credential: {0}")]
    Authentication(String),

    #[error("Model provider rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("Model request timed out: {0}")]
    Timeout(String),

    #[error("Network error while calling model provider: {0}")]
    Network(String),

    #[error("Model provider returned error status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response format from model provider: {0}")]
    InvalidResponse(String),
}

impl LLMError {
    pub fn kind(&self) -> &'static str {
        match self {
            LLMError::MissingCredential => "missing_credential",
            LLMError::Authentication(_) => "authentication",
            LLMError::RateLimited(_) => "rate_limited",
            LLMError::Timeout(_) => "timeout",
            LLMError::Network(_) => "network",
            LLMError::Api { .. } => "api",
            LLMError::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[async_trait]
pub trait LLMService: Send + Sync {
    /// Sends the prompt and returns the model's raw text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, LLMError>;
}

#[derive(Debug, Clone, Default)]
pub struct LLMClientConfig {
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

/// Single-attempt front for an [`LLMService`]. Failures are returned as-is;
/// nothing is retried.
#[derive(Clone)]
pub struct LLMClient {
    service: Arc<dyn LLMService>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(service: Arc<dyn LLMService>, config: Option<LLMClientConfig>) -> Self {
        Self {
            service,
            config: config.unwrap_or_default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &LLMClientConfig {
        &self.config
    }

    pub async fn execute(&self, prompt: &Prompt) -> Result<String, LLMError> {
        let started = Instant::now();

        let result = match self.config.timeout {
            Some(limit) => match timeout(limit, self.service.complete(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(LLMError::Timeout(format!("no response within {:?}", limit))),
            },
            None => self.service.complete(prompt).await,
        };

        match &result {
            Ok(text) => tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                response_chars = text.chars().count(),
                "Model call succeeded"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                kind = e.kind(),
                "Model call failed: {}",
                e
            ),
        }

        result
    }
}
