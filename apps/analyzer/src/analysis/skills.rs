//! Skill Extractor: pluggable, trait-based skill detection.
//!
//! Default: `KeywordSkillStrategy` (vocabulary substring match, deterministic).
//! Optional: `LlmSkillStrategy` (asks the provider for a JSON array of skills).
//!
//! `SkillExtractor` tries the generative strategy first when one is configured
//! and falls back to the keyword strategy on any failure. Both outputs go
//! through the same normalization so the cap and uniqueness rules hold for
//! either source.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::fallback::{run_with_fallback, FallbackReason, Resolved};
use crate::analysis::prompts::{excerpt, SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM};
use crate::llm_client::prompts::json_array_system;
use crate::llm_client::{parse_string_array, GenerativeTextProvider, LlmError, PromptRequest};

/// Characters of resume text forwarded to the provider.
const SKILLS_EXCERPT_CHARS: usize = 2000;
const SKILLS_MAX_TOKENS: u32 = 500;
const SKILLS_TEMPERATURE: f32 = 0.3;

/// Skills the keyword strategy recognizes, in output order and canonical casing.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "JavaScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Go",
    "Rust",
    // Frameworks
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    // Tooling and platforms
    "Git",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Jenkins",
    "Jira",
    // Data stores
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "MySQL",
    "SQLite",
    // Web
    "TypeScript",
    "HTML",
    "CSS",
    "SASS",
    "LESS",
    "Bootstrap",
    "jQuery",
    "Laravel",
    "ASP.NET",
    // Soft skills
    "Leadership",
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Project Management",
];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A way of turning resume text into a raw skill list.
/// Output is normalized by `SkillExtractor`, not by the strategy.
#[async_trait]
pub trait SkillStrategy: Send + Sync {
    /// "keyword" | "llm" - for logs.
    fn backend(&self) -> &'static str;

    async fn extract(&self, text: &str) -> Result<Vec<String>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSkillStrategy: deterministic fallback
// ────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring match against `SKILL_VOCABULARY`.
/// No tokenization: "Go" matches inside "good" and "Java" inside "JavaScript".
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordSkillStrategy;

impl KeywordSkillStrategy {
    pub fn match_vocabulary(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        SKILL_VOCABULARY
            .iter()
            .filter(|skill| text_lower.contains(&skill.to_lowercase()))
            .map(|skill| skill.to_string())
            .collect()
    }
}

#[async_trait]
impl SkillStrategy for KeywordSkillStrategy {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>, LlmError> {
        Ok(self.match_vocabulary(text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSkillStrategy: generative
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmSkillStrategy {
    provider: Arc<dyn GenerativeTextProvider>,
    system: String,
}

impl LlmSkillStrategy {
    pub fn new(provider: Arc<dyn GenerativeTextProvider>) -> Self {
        Self {
            provider,
            system: json_array_system(SKILLS_SYSTEM),
        }
    }
}

#[async_trait]
impl SkillStrategy for LlmSkillStrategy {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>, LlmError> {
        let prompt = build_skills_prompt(text);
        let reply = self
            .provider
            .complete(&PromptRequest {
                system: &self.system,
                prompt: &prompt,
                max_tokens: SKILLS_MAX_TOKENS,
                temperature: SKILLS_TEMPERATURE,
            })
            .await?;
        parse_string_array(&reply)
    }
}

fn build_skills_prompt(text: &str) -> String {
    SKILLS_PROMPT_TEMPLATE.replace("{resume_text}", excerpt(text, SKILLS_EXCERPT_CHARS))
}

// ────────────────────────────────────────────────────────────────────────────
// SkillExtractor: strategy chain + normalization
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillExtractor {
    generative: Option<Arc<dyn SkillStrategy>>,
    keyword: KeywordSkillStrategy,
    max_skills: usize,
    timeout: Duration,
}

impl SkillExtractor {
    pub fn new(
        generative: Option<Arc<dyn SkillStrategy>>,
        max_skills: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            generative,
            keyword: KeywordSkillStrategy,
            max_skills,
            timeout,
        }
    }

    /// Extracts skills, preferring the generative strategy when configured.
    pub async fn extract(&self, text: &str) -> Resolved<Vec<String>> {
        let raw = match &self.generative {
            Some(strategy) => {
                debug!("skills: trying {} strategy", strategy.backend());
                run_with_fallback("skills", self.timeout, strategy.extract(text), || {
                    self.keyword.match_vocabulary(text)
                })
                .await
            }
            None => Resolved::deterministic(
                self.keyword.match_vocabulary(text),
                FallbackReason::NoProvider,
            ),
        };

        Resolved {
            value: normalize_skills(raw.value, self.max_skills),
            source: raw.source,
        }
    }
}

/// Trims labels, drops blanks, removes case-insensitive duplicates (first one
/// wins), and truncates to `max_skills` preserving discovery order.
pub fn normalize_skills(raw: Vec<String>, max_skills: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(max_skills)
        .collect()
}
