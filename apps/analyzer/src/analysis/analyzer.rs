//! Resume Analysis: orchestrates the full analysis pipeline.
//!
//! Flow: validate input → extract skills → compute scores →
//!       generate recommendations → assemble `AnalysisResult`.
//!
//! Each provider-backed stage carries its own timeout and fallback, so a
//! failure in skill extraction does not stop the recommendation stage from
//! trying the provider. The only error surfaced at analysis time is empty input.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::recommendations::{
    LlmRecommendationStrategy, RecommendationGenerator, RecommendationStrategy,
};
use crate::analysis::scoring::{compute_scores, SectionScores};
use crate::analysis::skills::{LlmSkillStrategy, SkillExtractor, SkillStrategy};
use crate::errors::AnalysisError;
use crate::llm_client::GenerativeTextProvider;

pub const DEFAULT_MAX_SKILLS: usize = 8;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 8;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Full assessment of one resume. Field names match the JSON contract
/// consumed by the dashboard (`overallScore`, `sectionScores`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub section_scores: SectionScores,
    pub skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub extracted_text: String,
    pub file_name: String,
    pub analysis_date: DateTime<Utc>,
}

/// Per-call overrides for the one-shot `analyze` entry point.
#[derive(Clone, Default)]
pub struct AnalyzeOptions {
    pub provider: Option<Arc<dyn GenerativeTextProvider>>,
    pub max_skills: Option<usize>,
    pub max_recommendations: Option<usize>,
}

/// Analyzer configuration. Built explicitly and injected; there is no global default instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub max_skills: usize,
    pub max_recommendations: usize,
    /// Upper bound on each provider call (one per stage).
    pub provider_timeout: Duration,
    /// When false, building an analyzer without a provider is a configuration error.
    pub allow_fallback_only: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_skills: DEFAULT_MAX_SKILLS,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            allow_fallback_only: true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Stateless resume analyzer. Cheap to share behind an `Arc`; concurrent
/// `analyze` calls do not interact.
pub struct ResumeAnalyzer {
    skills: SkillExtractor,
    recommendations: RecommendationGenerator,
    provider_name: Option<String>,
}

impl ResumeAnalyzer {
    pub fn new(
        config: AnalyzerConfig,
        provider: Option<Arc<dyn GenerativeTextProvider>>,
    ) -> Result<Self, AnalysisError> {
        if config.max_skills == 0 {
            return Err(AnalysisError::Configuration(
                "max_skills must be at least 1".to_string(),
            ));
        }
        if config.max_recommendations == 0 {
            return Err(AnalysisError::Configuration(
                "max_recommendations must be at least 1".to_string(),
            ));
        }
        if provider.is_none() && !config.allow_fallback_only {
            return Err(AnalysisError::Configuration(
                "no generative provider configured and fallback-only mode is disabled".to_string(),
            ));
        }

        let provider_name = provider.as_ref().map(|p| p.name().to_string());

        let skill_strategy: Option<Arc<dyn SkillStrategy>> = provider
            .clone()
            .map(|p| Arc::new(LlmSkillStrategy::new(p)) as Arc<dyn SkillStrategy>);
        let recommendation_strategy: Option<Arc<dyn RecommendationStrategy>> = provider
            .map(|p| Arc::new(LlmRecommendationStrategy::new(p)) as Arc<dyn RecommendationStrategy>);

        Ok(Self {
            skills: SkillExtractor::new(skill_strategy, config.max_skills, config.provider_timeout),
            recommendations: RecommendationGenerator::new(
                recommendation_strategy,
                config.max_recommendations,
                config.provider_timeout,
            ),
            provider_name,
        })
    }

    /// Runs the full pipeline on already-extracted resume text.
    ///
    /// Steps:
    /// 1. reject empty / whitespace-only text
    /// 2. skills (generative, else keyword vocabulary)
    /// 3. scores (pure)
    /// 4. recommendations (generative, else threshold rules)
    pub async fn analyze(
        &self,
        resume_text: &str,
        file_name: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        info!(
            "Analyzing '{}' ({} chars, provider: {})",
            file_name,
            resume_text.chars().count(),
            self.provider_name.as_deref().unwrap_or("none")
        );

        // Step 1: Skills
        let skills = self.skills.extract(resume_text).await;
        info!(
            "Extracted {} skills via {:?}",
            skills.value.len(),
            skills.source
        );

        // Step 2: Scores
        let scores = compute_scores(resume_text, &skills.value);
        info!("ATS score: {}/100 for '{}'", scores.overall, file_name);

        // Step 3: Recommendations
        let recommendations = self
            .recommendations
            .generate(resume_text, &skills.value, &scores.sections)
            .await;
        info!(
            "Generated {} recommendations via {:?}",
            recommendations.value.len(),
            recommendations.source
        );

        Ok(AnalysisResult {
            overall_score: scores.overall,
            section_scores: scores.sections,
            skills: skills.value,
            recommendations: recommendations.value,
            extracted_text: resume_text.to_string(),
            file_name: file_name.to_string(),
            analysis_date: Utc::now(),
        })
    }
}

/// One-shot analysis with default configuration plus `options` overrides.
pub async fn analyze(
    resume_text: &str,
    file_name: &str,
    options: AnalyzeOptions,
) -> Result<AnalysisResult, AnalysisError> {
    let defaults = AnalyzerConfig::default();
    let config = AnalyzerConfig {
        max_skills: options.max_skills.unwrap_or(defaults.max_skills),
        max_recommendations: options
            .max_recommendations
            .unwrap_or(defaults.max_recommendations),
        ..defaults
    };
    ResumeAnalyzer::new(config, options.provider)?
        .analyze(resume_text, file_name)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
