use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::GenerationError;

pub const MAX_BULLET_POINTS: usize = 5;
pub const MAX_DISPLAY_DESCRIPTION_CHARS: usize = 1200;
pub const MAX_BULLET_POINT_CHARS: usize = 200;

/// Wire shape of `POST /generate`. Fields are optional here so that a missing
/// field is reported by [`GenerationRequestBody::into_request`] rather than
/// by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationRequestBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
}

impl GenerationRequestBody {
    pub fn into_request(self) -> Result<GenerationRequest, GenerationError> {
        GenerationRequest::new(
            self.title.unwrap_or_default(),
            self.body_html.unwrap_or_default(),
        )
    }
}

/// Product data for one generation call. Both fields are non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    title: String,
    body_html: String,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        body_html: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let title = title.into();
        let body_html = body_html.into();

        if title.trim().is_empty() {
            return Err(GenerationError::Validation(
                "field 'title' is required and must not be empty".to_string(),
            ));
        }
        if body_html.trim().is_empty() {
            return Err(GenerationError::Validation(
                "field 'body_html' is required and must not be empty".to_string(),
            ));
        }

        Ok(Self { title, body_html })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "displayDescription")]
    pub display_description: String,
    #[serde(rename = "bulletpoints", default)]
    pub bullet_points: Option<Vec<String>>,
}

/// JSON Schema for [`GenerationResult`]. The same document is shown to the
/// model and used to validate what it sends back.
pub fn product_content_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ProductContent",
        "description": "Generated product content for storefront display.",
        "type": "object",
        "properties": {
            "displayName": {
                "type": "string",
                "minLength": 1,
                "description": "Short, catchy product name for product cards. Must be shorter than the original title, 3-8 words, using only words from the title."
            },
            "displayDescription": {
                "type": "string",
                "minLength": 1,
                "maxLength": MAX_DISPLAY_DESCRIPTION_CHARS,
                "description": "Product description in 2-4 sentences (at most 150 words) describing only what the title and body_html state."
            },
            "bulletpoints": {
                "description": "Key features taken from body_html, 5-15 words each. null when body_html has no specific features.",
                "anyOf": [
                    {
                        "type": "array",
                        "maxItems": MAX_BULLET_POINTS,
                        "items": {
                            "type": "string",
                            "minLength": 1,
                            "maxLength": MAX_BULLET_POINT_CHARS
                        }
                    },
                    { "type": "null" }
                ]
            }
        },
        "required": ["displayName", "displayDescription"]
    })
}
