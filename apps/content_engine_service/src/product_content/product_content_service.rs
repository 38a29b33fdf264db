use std::sync::Arc;

use content_llm::LLMClient;
use serde_json::Value;

use super::{
    product_content_parser::ProductContentParser,
    product_content_prompt::build_prompt,
    product_content_schema::{product_content_json_schema, GenerationRequest, GenerationResult},
};
use crate::error::GenerationError;

#[derive(Clone)]
pub struct ProductContentService {
    llm_client: LLMClient,
    parser: Arc<ProductContentParser>,
    schema: Arc<Value>,
}

impl ProductContentService {
    pub fn new(llm_client: LLMClient) -> anyhow::Result<Self> {
        Ok(Self {
            llm_client,
            parser: Arc::new(ProductContentParser::new()?),
            schema: Arc::new(product_content_json_schema()),
        })
    }

    /// Prompt, one model call, then strict parsing. Errors from any stage are
    /// returned unchanged.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let prompt = build_prompt(request, &self.schema);
        tracing::debug!(prompt_bytes = prompt.len(), "Built product content prompt");

        let raw = self.llm_client.execute(&prompt).await?;

        let result = self.parser.parse(&raw, request)?;
        tracing::info!(
            display_name_chars = result.display_name.chars().count(),
            bullet_points = result.bullet_points.as_ref().map_or(0, Vec::len),
            "Generated product content"
        );

        Ok(result)
    }
}
