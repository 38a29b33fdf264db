use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{LLMError, LLMService, Prompt};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

pub struct AnthropicService {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicService {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn headers(&self) -> Result<HeaderMap, LLMError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(LLMError::MissingCredential)?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(api_key).map_err(|_| {
            LLMError::Authentication("API key is not a valid header value".to_string())
        })?;
        headers.insert("x-api-key", api_key);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

fn map_transport_error(error: reqwest::Error) -> LLMError {
    if error.is_timeout() {
        LLMError::Timeout(error.to_string())
    } else {
        LLMError::Network(error.to_string())
    }
}

fn map_status(status: StatusCode, body: String) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::Authentication(body),
        // 529 is Anthropic's "overloaded" status.
        429 | 529 => LLMError::RateLimited(body),
        code => LLMError::Api { status: code, body },
    }
}

#[async_trait]
impl LLMService for AnthropicService {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LLMError> {
        let headers = self.headers()?;

        let request = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &prompt.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &prompt.user,
            }],
        };

        tracing::debug!(model = %self.config.model, "Sending request to Anthropic");

        let response = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        let response = response
            .json::<AnthropicResponse>()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        let text = response
            .content
            .iter()
            .filter(|block| block.r#type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<&str>>()
            .join("");

        if text.trim().is_empty() {
            return Err(LLMError::InvalidResponse(
                "response contained no text content".to_string(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn service_for(server: &MockServer, api_key: Option<&str>) -> AnthropicService {
        AnthropicService::new(AnthropicConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.uri(),
            ..AnthropicConfig::default()
        })
    }

    fn prompt() -> Prompt {
        Prompt::new("You rewrite product copy.", "Title: Lamp")
    }

    #[tokio::test]
    async fn complete_joins_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "system": "You rewrite product copy.",
                "messages": [{ "role": "user", "content": "Title: Lamp" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    { "type": "text", "text": "{\"displayName\":" },
                    { "type": "tool_use", "id": "ignored" },
                    { "type": "text", "text": " \"Lamp\"}" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = service_for(&server, Some("test-key"))
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, "{\"displayName\": \"Lamp\"}");
    }

    #[tokio::test]
    async fn missing_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service_for(&server, Some("   "))
            .complete(&prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::MissingCredential));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .mount(&server)
            .await;

        let err = service_for(&server, Some("bad"))
            .complete(&prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::Authentication(ref body) if body.contains("invalid")));
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("busy"))
            .expect(1)
            .mount(&server)
            .await;

        let err = service_for(&server, Some("key"))
            .complete(&prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::RateLimited(ref body) if body == "busy"));
    }

    #[test]
    fn overloaded_status_maps_to_rate_limited() {
        let status = StatusCode::from_u16(529).unwrap();

        let err = map_status(status, "overloaded_error".to_string());

        assert!(matches!(err, LLMError::RateLimited(ref body) if body == "overloaded_error"));
    }

    #[test]
    fn forbidden_maps_to_authentication() {
        let err = map_status(StatusCode::FORBIDDEN, "no access".to_string());
        assert_eq!(err.kind(), "authentication");
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = service_for(&server, Some("key"))
            .complete(&prompt())
            .await
            .unwrap_err();

        match err {
            LLMError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .mount(&server)
            .await;

        let err = service_for(&server, Some("key"))
            .complete(&prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let service = AnthropicService::new(AnthropicConfig {
            api_key: Some("key".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            ..AnthropicConfig::default()
        });

        let err = service.complete(&prompt()).await.unwrap_err();

        assert!(matches!(err, LLMError::Network(_)));
    }
}
