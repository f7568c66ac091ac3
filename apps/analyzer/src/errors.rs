use thiserror::Error;

/// Errors surfaced by the analysis engine.
///
/// Provider failures never appear here: every provider-backed stage degrades
/// to its keyword strategy instead (see `analysis::fallback`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The resume text was empty or whitespace-only after upstream extraction.
    #[error("Resume text is empty; nothing to analyze")]
    EmptyInput,

    /// Raised while building an analyzer, never mid-analysis.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
