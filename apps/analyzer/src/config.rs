use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::analyzer::{
    AnalyzerConfig, DEFAULT_MAX_RECOMMENDATIONS, DEFAULT_MAX_SKILLS, DEFAULT_PROVIDER_TIMEOUT,
};

const DEFAULT_PROVIDER_MAX_CONCURRENCY: usize = 4;

/// Process configuration loaded from environment variables (and `.env` if present).
/// Every variable is optional; without `ANTHROPIC_API_KEY` the analyzer runs
/// on its keyword strategies only.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub provider_max_concurrency: usize,
    pub max_skills: usize,
    pub max_recommendations: usize,
    pub allow_fallback_only: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            anthropic_api_key: get("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            provider_timeout: Duration::from_secs(parse_or(
                &get,
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT.as_secs(),
            )?),
            provider_max_concurrency: parse_or(
                &get,
                "PROVIDER_MAX_CONCURRENCY",
                DEFAULT_PROVIDER_MAX_CONCURRENCY,
            )?,
            max_skills: parse_or(&get, "MAX_SKILLS", DEFAULT_MAX_SKILLS)?,
            max_recommendations: parse_or(&get, "MAX_RECOMMENDATIONS", DEFAULT_MAX_RECOMMENDATIONS)?,
            allow_fallback_only: match get("ALLOW_FALLBACK_ONLY") {
                Some(raw) => parse_bool(&raw).context("ALLOW_FALLBACK_ONLY must be true or false")?,
                None => true,
            },
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            max_skills: self.max_skills,
            max_recommendations: self.max_recommendations,
            provider_timeout: self.provider_timeout,
            allow_fallback_only: self.allow_fallback_only,
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}
