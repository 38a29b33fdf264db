use content_llm::Prompt;
use serde_json::Value;

use super::product_content_schema::{GenerationRequest, MAX_BULLET_POINTS};

pub const SYSTEM_PROMPT: &str = "You are an expert e-commerce copywriter who rewrites raw product data into display content for an online store. You must ONLY use information provided in the product data. Do NOT invent information. Prioritize accuracy and compliance over marketing flair. Avoid health claims that could trigger platform flags. Respond with JSON only.";

const RULES: &str = r#"CRITICAL: ACCURACY AND COMPLIANCE ARE MORE IMPORTANT THAN MARKETING FLAIR.

Generate display content from the product data below.

INPUT:
- title: the original product title (may be long or contain unnecessary words)
- body_html: the product description HTML (may contain specifications, features, etc.)

OUTPUT REQUIREMENTS:

1. displayName:
   - MUST be shorter than the original title
   - 3-8 words
   - Remove brand prefixes, "SPECIFICATIONS", SKUs, model numbers and other technical codes
   - Focus on the core product or its key feature
   - ONLY use words from the title
   - Example: "Turmeric & Vitamin C Cream" instead of "Turmeric & Vitamin C Cream -Lightweight Nourishment for Face& Neck, Fast-Absorbing HydrationAll Skin Types"

2. displayDescription:
   - 2-4 sentences, at most 150 words
   - ONLY describe what is explicitly stated in the title and body_html
   - If body_html is minimal, work with what the title gives you
   - Do NOT invent features, benefits or specifications
   - A shorter accurate description is better than a longer invented one

3. bulletpoints:
   - ONLY include bullet points if body_html contains specific, extractable features
   - Do NOT create bullet points from generic or obvious information
   - If body_html has no specific features, set bulletpoints to null
   - At most {max_bullets} bullet points; only as many as there are distinct facts
   - Each bullet is 5-15 words, directly derived from body_html
   - Each bullet starts with a capital letter and ends without punctuation

COMPLIANCE:
- NEVER make health claims (e.g. "cures", "treats", "prevents", "heals", "reduces symptoms")
- NEVER make medical or regulatory claims (e.g. "FDA approved for", "clinically proven to cure")
- Prefer "may help", "supports", "designed for" over definitive claims
- Avoid phrases that could trigger flags on ad platforms, marketplaces or payment processors
- If unsure about a claim, leave it out
- Say "Contains vitamin C", not "Vitamin C cures skin problems"
- Say "Moisturizing formula", not "Eliminates wrinkles and fine lines"

ACCURACY:
- NEVER add information that is not in the title or body_html
- NEVER assume product features, benefits or specifications
- Ignore HTML tags and formatting when extracting information
- Incomplete information is acceptable, invented information is not"#;

const REMINDER: &str = "IMPORTANT: Only use information from the Title and Body HTML above. Do not add anything that is not explicitly stated. Avoid health claims. Reply with a single JSON object and nothing else.";

/// Builds the full model payload for one request: role statement, rules,
/// output schema, then the product data. Pure and deterministic.
pub fn build_prompt(request: &GenerationRequest, schema: &Value) -> Prompt {
    let rules = RULES.replace("{max_bullets}", &MAX_BULLET_POINTS.to_string());

    let user = format!(
        r#"{rules}

OUTPUT FORMAT:
The output must be a JSON object that conforms to the JSON schema below. Use exactly these field names. Do not wrap the object in other keys.

{schema:#}

PRODUCT DATA:
Title: {title}
Body HTML: {body_html}

{reminder}"#,
        rules = rules,
        schema = schema,
        title = request.title(),
        body_html = request.body_html(),
        reminder = REMINDER,
    );

    Prompt::new(SYSTEM_PROMPT, user)
}
