use jsonschema::Validator;
use serde_json::Value;

use super::product_content_schema::{
    product_content_json_schema, GenerationRequest, GenerationResult, MAX_BULLET_POINTS,
    MAX_BULLET_POINT_CHARS, MAX_DISPLAY_DESCRIPTION_CHARS,
};
use crate::error::GenerationError;

/// Turns raw model text into a validated [`GenerationResult`]. Validation is
/// all-or-nothing: any violation rejects the whole response.
pub struct ProductContentParser {
    validator: Validator,
}

impl ProductContentParser {
    pub fn new() -> anyhow::Result<Self> {
        let schema = product_content_json_schema();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| anyhow::anyhow!("Failed to compile product content schema: {}", e))?;

        Ok(Self { validator })
    }

    pub fn parse(
        &self,
        raw: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let json = extract_json_object(raw).ok_or_else(|| {
            GenerationError::SchemaViolation("no JSON object found in model output".to_string())
        })?;

        let value: Value = serde_json::from_str(json).map_err(|e| {
            GenerationError::SchemaViolation(format!("model output is not valid JSON: {}", e))
        })?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|e| e.to_string())
            .collect();
        if !violations.is_empty() {
            return Err(GenerationError::SchemaViolation(violations.join("; ")));
        }

        let result: GenerationResult = serde_json::from_value(value).map_err(|e| {
            GenerationError::SchemaViolation(format!("model output has the wrong shape: {}", e))
        })?;

        check_constraints(result, request)
    }
}

/// Locates the JSON object in a model reply. Accepts a bare object, one inside
/// a Markdown code fence, or one surrounded by prose.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();

    let candidate = match trimmed.find("```") {
        Some(fence_start) => {
            // The info string ("json") holds no brace, so the search for
            // '{' below skips it whether or not a newline follows it.
            let body = &trimmed[fence_start + 3..];
            match body.find("```") {
                Some(fence_end) => &body[..fence_end],
                None => body,
            }
        }
        None => trimmed,
    };

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end < start {
        return None;
    }

    Some(&candidate[start..=end])
}

fn check_constraints(
    result: GenerationResult,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    let display_name = result.display_name.trim().to_string();
    let display_description = result.display_description.trim().to_string();

    if display_name.is_empty() {
        return Err(GenerationError::SchemaViolation(
            "displayName must not be empty".to_string(),
        ));
    }

    let name_chars = display_name.chars().count();
    let title_chars = request.title().trim().chars().count();
    if name_chars >= title_chars {
        return Err(GenerationError::SchemaViolation(format!(
            "displayName has {} characters but must be shorter than the {}-character title",
            name_chars, title_chars
        )));
    }

    if display_description.is_empty() {
        return Err(GenerationError::SchemaViolation(
            "displayDescription must not be empty".to_string(),
        ));
    }

    let description_chars = display_description.chars().count();
    if description_chars > MAX_DISPLAY_DESCRIPTION_CHARS {
        return Err(GenerationError::SchemaViolation(format!(
            "displayDescription has {} characters, limit is {}",
            description_chars, MAX_DISPLAY_DESCRIPTION_CHARS
        )));
    }

    let bullet_points = match result.bullet_points {
        None => None,
        // An empty list is how the model says "no bullets".
        Some(points) if points.is_empty() => None,
        Some(points) => {
            if points.len() > MAX_BULLET_POINTS {
                return Err(GenerationError::SchemaViolation(format!(
                    "bulletpoints has {} entries, limit is {}",
                    points.len(),
                    MAX_BULLET_POINTS
                )));
            }

            let mut cleaned = Vec::with_capacity(points.len());
            for (index, point) in points.into_iter().enumerate() {
                let point = point.trim().to_string();
                if point.is_empty() {
                    return Err(GenerationError::SchemaViolation(format!(
                        "bulletpoints[{}] must not be empty",
                        index
                    )));
                }
                if point.chars().count() > MAX_BULLET_POINT_CHARS {
                    return Err(GenerationError::SchemaViolation(format!(
                        "bulletpoints[{}] exceeds {} characters",
                        index, MAX_BULLET_POINT_CHARS
                    )));
                }
                cleaned.push(point);
            }
            Some(cleaned)
        }
    };

    Ok(GenerationResult {
        display_name,
        display_description,
        bullet_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: &str = "Turmeric & Vitamin C Cream - Lightweight Nourishment 50ml Jar SKU1234";

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            TITLE,
            "<h1>SPECIFICATIONS</h1><p>Feature: Moisturizing, Brightening</p>",
        )
        .unwrap()
    }

    fn parse(raw: &str) -> Result<GenerationResult, GenerationError> {
        ProductContentParser::new().unwrap().parse(raw, &request())
    }

    fn assert_schema_violation(result: Result<GenerationResult, GenerationError>) {
        match result {
            Err(GenerationError::SchemaViolation(_)) => {}
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn parses_bare_json() {
        let result = parse(
            r#"{
                "displayName": "Turmeric & Vitamin C Cream",
                "displayDescription": "A lightweight turmeric and vitamin C cream.",
                "bulletpoints": ["Moisturizing formula for daily use", "Brightening feature listed by the maker"]
            }"#,
        )
        .unwrap();

        assert_eq!(result.display_name, "Turmeric & Vitamin C Cream");
        assert!(result.display_name.chars().count() < TITLE.chars().count());
        assert!(!result.display_name.contains("SKU"));
        assert_eq!(result.bullet_points.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let raw = "Here is the content:\n```json\n{\"displayName\": \"Vitamin C Cream\", \"displayDescription\": \"A light cream.\", \"bulletpoints\": null}\n```\nLet me know!";

        let result = parse(raw).unwrap();

        assert_eq!(result.display_name, "Vitamin C Cream");
        assert_eq!(result.bullet_points, None);
    }

    #[test]
    fn missing_bulletpoints_is_none() {
        let result =
            parse(r#"{"displayName": "Vitamin C Cream", "displayDescription": "A light cream."}"#)
                .unwrap();
        assert_eq!(result.bullet_points, None);
    }

    #[test]
    fn empty_bullet_list_becomes_none() {
        let result = parse(
            r#"{"displayName": "Vitamin C Cream", "displayDescription": "A light cream.", "bulletpoints": []}"#,
        )
        .unwrap();
        assert_eq!(result.bullet_points, None);
    }

    #[test]
    fn non_json_text_is_rejected() {
        assert_schema_violation(parse("I'm sorry, I can't help with that."));
    }

    #[test]
    fn truncated_json_is_rejected() {
        assert_schema_violation(parse(r#"{"displayName": "Vitamin C Cream", "displayDesc"#));
    }

    #[test]
    fn missing_display_name_is_rejected() {
        assert_schema_violation(parse(r#"{"displayDescription": "A light cream."}"#));
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert_schema_violation(parse(
            r#"{"displayName": 42, "displayDescription": "A light cream."}"#,
        ));
        assert_schema_violation(parse(
            r#"{"displayName": "Cream", "displayDescription": "A light cream.", "bulletpoints": "Moisturizing"}"#,
        ));
    }

    #[test]
    fn blank_display_name_is_rejected() {
        assert_schema_violation(parse(
            r#"{"displayName": "   ", "displayDescription": "A light cream."}"#,
        ));
    }

    #[test]
    fn display_name_not_shorter_than_title_is_rejected() {
        let raw = format!(
            r#"{{"displayName": "{}", "displayDescription": "A light cream."}}"#,
            TITLE
        );
        assert_schema_violation(parse(&raw));
    }

    #[test]
    fn blank_bullet_is_rejected() {
        assert_schema_violation(parse(
            r#"{"displayName": "Cream", "displayDescription": "A light cream.", "bulletpoints": ["Moisturizing", "  "]}"#,
        ));
    }

    #[test]
    fn too_many_bullets_are_rejected() {
        assert_schema_violation(parse(
            r#"{"displayName": "Cream", "displayDescription": "A light cream.", "bulletpoints": ["a", "b", "c", "d", "e", "f"]}"#,
        ));
    }

    #[test]
    fn overlong_description_is_rejected() {
        let raw = format!(
            r#"{{"displayName": "Cream", "displayDescription": "{}"}}"#,
            "x".repeat(MAX_DISPLAY_DESCRIPTION_CHARS + 1)
        );
        assert_schema_violation(parse(&raw));
    }

    #[test]
    fn parses_single_line_fence_followed_by_prose() {
        let raw = "```json {\"displayName\": \"Vitamin C Cream\", \"displayDescription\": \"A light cream.\"}```\nHope this helps.";

        let result = parse(raw).unwrap();

        assert_eq!(result.display_name, "Vitamin C Cream");
        assert_eq!(result.display_description, "A light cream.");
    }

    #[test]
    fn extract_ignores_braces_after_closing_fence() {
        assert_eq!(
            extract_json_object("```json\n{\"a\": 1}\n```\nNote: {see above}"),
            Some("{\"a\": 1}")
        );
    }

    #[test]
    fn extract_handles_unterminated_fence() {
        assert_eq!(
            extract_json_object("```json\n{\"a\": 1}"),
            Some("{\"a\": 1}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
