//! LLM prompts for the extraction and merge pipeline.

/// System instruction for knowledge extraction.
pub const EXTRACT_SYSTEM_PROMPT: &str = r#"You are a text analysis assistant. Extract the key information from the given text.

Rules:
1. Identify every category of key information the text contains (for example: organization name, founding date, motto).
2. Extract the concrete values belonging to each category.
3. Return JSON where each key is a category label and each value is an ARRAY of strings.
4. When a category has several values, put all of them in the array.
5. Return only valid JSON, with no extra commentary.

Example shape:
{
    "organization": ["..."],
    "founded": ["..."],
    "motto": ["..."]
}"#;

/// System instruction for merging knowledge objects.
pub const MERGE_SYSTEM_PROMPT: &str = r#"You are a knowledge fusion assistant. Merge the given JSON knowledge objects into one.

Rules:
1. Identify the categories shared across the inputs and the categories unique to each input.
2. For shared categories: drop duplicate values, keep every distinct value, and lose no information.
3. For categories that appear in only one input: keep the category and all of its values.
4. Return the merged result as a single JSON object with the same shape as the inputs (category -> array of strings).
5. Return only valid JSON, with no extra commentary."#;

/// Build the user message for an extraction call.
pub fn format_extract_user(content: &str) -> String {
    format!("Analyze the following text and extract all key information:\n\n{content}")
}

/// Build the user message for a merge call.
pub fn format_merge_user(payload: &str) -> String {
    format!("Merge the following JSON objects: {payload}")
}
