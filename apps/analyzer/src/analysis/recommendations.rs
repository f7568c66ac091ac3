//! Recommendation Generator: improvement suggestions from text, skills, and scores.
//!
//! Default: `RuleRecommendationStrategy` (fixed, ordered threshold rules).
//! Optional: `LlmRecommendationStrategy` (asks the provider for 5-8 suggestions).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::fallback::{run_with_fallback, FallbackReason, Resolved};
use crate::analysis::prompts::{
    excerpt, RECOMMENDATIONS_PROMPT_TEMPLATE, RECOMMENDATIONS_SYSTEM,
};
use crate::analysis::scoring::SectionScores;
use crate::llm_client::prompts::json_array_system;
use crate::llm_client::{parse_string_array, GenerativeTextProvider, LlmError, PromptRequest};

const RECOMMENDATIONS_EXCERPT_CHARS: usize = 1500;
const RECOMMENDATIONS_MAX_TOKENS: u32 = 800;
const RECOMMENDATIONS_TEMPERATURE: f32 = 0.4;

const MIN_SKILL_COUNT: usize = 5;
const EXPERIENCE_THRESHOLD: u32 = 70;
const EDUCATION_THRESHOLD: u32 = 60;
const FORMAT_THRESHOLD: u32 = 80;

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

/// Inputs every fallback rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub skills: &'a [String],
    pub scores: &'a SectionScores,
}

/// One fallback rule: when `applies` holds, all of `messages` are emitted in order.
pub struct RecommendationRule {
    pub name: &'static str,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub messages: &'static [&'static str],
}

fn too_few_skills(ctx: &RuleContext<'_>) -> bool {
    ctx.skills.len() < MIN_SKILL_COUNT
}

fn weak_experience(ctx: &RuleContext<'_>) -> bool {
    ctx.scores.experience < EXPERIENCE_THRESHOLD
}

fn weak_education(ctx: &RuleContext<'_>) -> bool {
    ctx.scores.education < EDUCATION_THRESHOLD
}

fn weak_format(ctx: &RuleContext<'_>) -> bool {
    ctx.scores.format < FORMAT_THRESHOLD
}

fn always(_ctx: &RuleContext<'_>) -> bool {
    true
}

/// Evaluated top to bottom; earlier rules take priority when the cap is hit.
pub const FALLBACK_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        name: "too_few_skills",
        applies: too_few_skills,
        messages: &["Add more technical skills to improve ATS compatibility"],
    },
    RecommendationRule {
        name: "weak_experience",
        applies: weak_experience,
        messages: &[
            "Use more action-oriented verbs in your experience descriptions",
            "Quantify your achievements with specific metrics",
        ],
    },
    RecommendationRule {
        name: "weak_education",
        applies: weak_education,
        messages: &["Ensure your education section is clearly formatted"],
    },
    RecommendationRule {
        name: "weak_format",
        applies: weak_format,
        messages: &[
            "Consider using bullet points for better readability",
            "Ensure consistent formatting throughout the document",
        ],
    },
    RecommendationRule {
        name: "general",
        applies: always,
        messages: &[
            "Include relevant keywords from job descriptions",
            "Add a professional summary at the top",
            "Keep your resume to 1-2 pages maximum",
        ],
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RecommendationStrategy: Send + Sync {
    /// "rules" | "llm" - for logs.
    fn backend(&self) -> &'static str;

    async fn recommend(
        &self,
        text: &str,
        skills: &[String],
        scores: &SectionScores,
    ) -> Result<Vec<String>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleRecommendationStrategy: deterministic fallback
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleRecommendationStrategy;

impl RuleRecommendationStrategy {
    /// Every message from every applicable rule, in rule order. Never empty:
    /// the general rule always applies.
    pub fn apply_rules(&self, skills: &[String], scores: &SectionScores) -> Vec<String> {
        let ctx = RuleContext { skills, scores };
        FALLBACK_RULES
            .iter()
            .filter(|rule| (rule.applies)(&ctx))
            .inspect(|rule| debug!("recommendation rule fired: {}", rule.name))
            .flat_map(|rule| rule.messages.iter().map(|m| m.to_string()))
            .collect()
    }
}

#[async_trait]
impl RecommendationStrategy for RuleRecommendationStrategy {
    fn backend(&self) -> &'static str {
        "rules"
    }

    async fn recommend(
        &self,
        _text: &str,
        skills: &[String],
        scores: &SectionScores,
    ) -> Result<Vec<String>, LlmError> {
        Ok(self.apply_rules(skills, scores))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRecommendationStrategy: generative
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmRecommendationStrategy {
    provider: Arc<dyn GenerativeTextProvider>,
    system: String,
}

impl LlmRecommendationStrategy {
    pub fn new(provider: Arc<dyn GenerativeTextProvider>) -> Self {
        Self {
            provider,
            system: json_array_system(RECOMMENDATIONS_SYSTEM),
        }
    }
}

#[async_trait]
impl RecommendationStrategy for LlmRecommendationStrategy {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn recommend(
        &self,
        text: &str,
        skills: &[String],
        scores: &SectionScores,
    ) -> Result<Vec<String>, LlmError> {
        let prompt = build_recommendations_prompt(text, skills, scores);
        let reply = self
            .provider
            .complete(&PromptRequest {
                system: &self.system,
                prompt: &prompt,
                max_tokens: RECOMMENDATIONS_MAX_TOKENS,
                temperature: RECOMMENDATIONS_TEMPERATURE,
            })
            .await?;
        parse_string_array(&reply)
    }
}

/// Fills the template. Resume text goes in last so placeholder-like text
/// inside the resume is never substituted.
fn build_recommendations_prompt(text: &str, skills: &[String], scores: &SectionScores) -> String {
    RECOMMENDATIONS_PROMPT_TEMPLATE
        .replace("{skills}", &skills.join(", "))
        .replace("{skills_score}", &scores.skills.to_string())
        .replace("{experience_score}", &scores.experience.to_string())
        .replace("{education_score}", &scores.education.to_string())
        .replace("{format_score}", &scores.format.to_string())
        .replace(
            "{resume_text}",
            excerpt(text, RECOMMENDATIONS_EXCERPT_CHARS),
        )
}

// ────────────────────────────────────────────────────────────────────────────
// RecommendationGenerator: strategy chain + cap
// ────────────────────────────────────────────────────────────────────────────

pub struct RecommendationGenerator {
    generative: Option<Arc<dyn RecommendationStrategy>>,
    rules: RuleRecommendationStrategy,
    max_recommendations: usize,
    timeout: Duration,
}

impl RecommendationGenerator {
    pub fn new(
        generative: Option<Arc<dyn RecommendationStrategy>>,
        max_recommendations: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            generative,
            rules: RuleRecommendationStrategy,
            max_recommendations,
            timeout,
        }
    }

    pub async fn generate(
        &self,
        text: &str,
        skills: &[String],
        scores: &SectionScores,
    ) -> Resolved<Vec<String>> {
        let raw = match &self.generative {
            Some(strategy) => {
                debug!("recommendations: trying {} strategy", strategy.backend());
                run_with_fallback(
                    "recommendations",
                    self.timeout,
                    strategy.recommend(text, skills, scores),
                    || self.rules.apply_rules(skills, scores),
                )
                .await
            }
            None => Resolved::deterministic(
                self.rules.apply_rules(skills, scores),
                FallbackReason::NoProvider,
            ),
        };

        Resolved {
            value: raw
                .value
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .take(self.max_recommendations)
                .collect(),
            source: raw.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fallback::Source;
    use crate::llm_client::provider::fakes::{FailingProvider, HangingProvider, StaticProvider};

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn scores(skills: u32, experience: u32, education: u32, format: u32) -> SectionScores {
        SectionScores {
            skills,
            experience,
            education,
            format,
        }
    }

    fn skill_list(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("skill-{i}")).collect()
    }

    fn rules_only(max: usize) -> RecommendationGenerator {
        RecommendationGenerator::new(None, max, TIMEOUT)
    }

    fn with_provider(provider: Arc<dyn GenerativeTextProvider>) -> RecommendationGenerator {
        RecommendationGenerator::new(
            Some(Arc::new(LlmRecommendationStrategy::new(provider))),
            8,
            TIMEOUT,
        )
    }

    #[test]
    fn test_strong_resume_gets_only_general_advice() {
        let recs = RuleRecommendationStrategy.apply_rules(&skill_list(6), &scores(60, 90, 85, 85));
        assert_eq!(
            recs,
            vec![
                "Include relevant keywords from job descriptions",
                "Add a professional summary at the top",
                "Keep your resume to 1-2 pages maximum",
            ]
        );
    }

    #[test]
    fn test_rules_fire_in_priority_order() {
        let recs = RuleRecommendationStrategy.apply_rules(&skill_list(2), &scores(20, 30, 40, 60));
        assert_eq!(recs.len(), 9);
        assert_eq!(recs[0], "Add more technical skills to improve ATS compatibility");
        assert_eq!(
            recs[1],
            "Use more action-oriented verbs in your experience descriptions"
        );
        assert_eq!(recs[2], "Quantify your achievements with specific metrics");
        assert_eq!(recs[3], "Ensure your education section is clearly formatted");
        assert_eq!(recs[4], "Consider using bullet points for better readability");
        assert_eq!(recs[5], "Ensure consistent formatting throughout the document");
        assert_eq!(recs[6], "Include relevant keywords from job descriptions");
    }

    #[test]
    fn test_thresholds_are_strict_less_than() {
        let recs = RuleRecommendationStrategy.apply_rules(&skill_list(5), &scores(50, 70, 60, 80));
        assert_eq!(recs.len(), 3, "boundary values must not trigger rules: {recs:?}");
    }

    #[tokio::test]
    async fn test_cap_drops_lowest_priority_general_advice() {
        let resolved = rules_only(8)
            .generate("text", &skill_list(0), &scores(20, 30, 40, 60))
            .await;
        assert_eq!(resolved.value.len(), 8);
        assert_eq!(
            resolved.value.last().map(String::as_str),
            Some("Add a professional summary at the top")
        );
        assert_eq!(
            resolved.source,
            Source::Deterministic(FallbackReason::NoProvider)
        );
    }

    #[tokio::test]
    async fn test_small_cap_keeps_highest_priority_rules() {
        let resolved = rules_only(2)
            .generate("text", &skill_list(0), &scores(20, 30, 40, 60))
            .await;
        assert_eq!(
            resolved.value,
            vec![
                "Add more technical skills to improve ATS compatibility",
                "Use more action-oriented verbs in your experience descriptions",
            ]
        );
    }

    #[tokio::test]
    async fn test_generative_recommendations_used_and_capped() {
        let advice: Vec<String> = (0..12).map(|i| format!("Advice {i}")).collect();
        let provider = Arc::new(StaticProvider::new(&serde_json::to_string(&advice).unwrap()));
        let resolved = with_provider(provider)
            .generate("text", &skill_list(3), &scores(30, 42, 40, 60))
            .await;
        assert!(resolved.is_generative());
        assert_eq!(resolved.value.len(), 8);
        assert_eq!(resolved.value[0], "Advice 0");
    }

    #[tokio::test]
    async fn test_prompt_includes_skills_scores_and_excerpt() {
        let provider = Arc::new(StaticProvider::new(r#"["Add metrics"]"#));
        let text = format!("{}{}", "b".repeat(1500), "TAIL_MARKER");
        let skills = vec!["Rust".to_string(), "Go".to_string()];
        with_provider(provider.clone())
            .generate(&text, &skills, &scores(20, 66, 40, 85))
            .await;

        let prompt = provider.prompts().remove(0);
        assert!(prompt.contains("CURRENT SKILLS: Rust, Go"));
        assert!(prompt.contains("Skills 20/100, Experience 66/100, Education 40/100, Format 85/100"));
        assert!(prompt.contains(&"b".repeat(1500)));
        assert!(!prompt.contains("TAIL_MARKER"));
    }

    #[test]
    fn test_placeholder_text_in_resume_is_not_substituted() {
        let prompt = build_recommendations_prompt("my {skills} section", &[], &scores(1, 2, 3, 4));
        assert!(prompt.contains("my {skills} section"));
    }

    #[tokio::test]
    async fn test_malformed_reply_matches_rules_output() {
        let skills = skill_list(2);
        let section = scores(20, 30, 40, 60);
        let expected = rules_only(8).generate("text", &skills, &section).await.value;

        for reply in ["not json", r#"{"advice": []}"#, "[]", "[1, 2]"] {
            let resolved = with_provider(Arc::new(StaticProvider::new(reply)))
                .generate("text", &skills, &section)
                .await;
            assert_eq!(resolved.value, expected, "reply {reply:?}");
            assert!(!resolved.is_generative());
        }
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(FailingProvider::default());
        let resolved = with_provider(provider.clone())
            .generate("text", &skill_list(6), &scores(60, 90, 85, 85))
            .await;
        assert_eq!(resolved.value.len(), 3);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_falls_back() {
        let resolved = with_provider(Arc::new(HangingProvider))
            .generate("text", &skill_list(6), &scores(60, 90, 85, 85))
            .await;
        assert_eq!(resolved.source, Source::Deterministic(FallbackReason::Timeout));
        assert_eq!(resolved.value.len(), 3);
    }
}
