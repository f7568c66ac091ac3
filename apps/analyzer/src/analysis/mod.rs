// Resume analysis engine: skill extraction, scoring, recommendations.
// Provider calls go through llm_client::GenerativeTextProvider only.

pub mod analyzer;
pub mod fallback;
pub mod prompts;
pub mod recommendations;
pub mod scoring;
pub mod skills;
