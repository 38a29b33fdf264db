use std::sync::Arc;

use content_llm::{AnthropicService, LLMClient, LLMService};

use crate::{config::AppConfig, product_content::product_content_service::ProductContentService};

#[derive(Clone)]
pub struct AppService {
    pub product_content_service: ProductContentService,
}

impl AppService {
    pub fn new(config: &AppConfig, llm_service: Arc<dyn LLMService>) -> anyhow::Result<Self> {
        let llm_client = LLMClient::new(llm_service, Some(config.llm_client_config()));
        let product_content_service = ProductContentService::new(llm_client)?;

        Ok(Self {
            product_content_service,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State backed by the Anthropic API.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let llm_service: Arc<dyn LLMService> =
            Arc::new(AnthropicService::new(config.anthropic.clone()));
        Self::with_llm_service(config, llm_service)
    }

    pub fn with_llm_service(
        config: AppConfig,
        llm_service: Arc<dyn LLMService>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            service: AppService::new(&config, llm_service)?,
            config: Arc::new(config),
        })
    }
}
