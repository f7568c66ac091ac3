pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;

pub use analysis::analyzer::{
    analyze, AnalysisResult, AnalyzeOptions, AnalyzerConfig, ResumeAnalyzer,
};
pub use analysis::scoring::SectionScores;
pub use errors::AnalysisError;
pub use llm_client::{GenerativeTextProvider, LlmClient, LlmError};
