// Shared prompt fragments. Each analysis stage keeps its own prompt templates
// in analysis/prompts.rs; only cross-cutting pieces live here.

/// Appended to every stage's system prompt so replies are a bare JSON array.
pub const JSON_ARRAY_ONLY: &str = "You MUST respond with a valid JSON array only. \
    Do NOT wrap it in an object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a stage-specific system prompt with the JSON-array instruction.
pub fn json_array_system(role: &str) -> String {
    format!("{role} {JSON_ARRAY_ONLY}")
}
