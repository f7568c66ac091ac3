//! Fallback chain: runs a provider-backed attempt under a timeout and
//! substitutes the deterministic result when it fails.
//!
//! Both provider-backed stages go through `run_with_fallback`, so the policy
//! (timeout, logging, what counts as failure) lives in one place and can be
//! tested with plain futures.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::LlmError;

/// Why the deterministic strategy produced a stage's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No provider configured for this analyzer.
    NoProvider,
    /// The provider did not answer within the stage timeout.
    Timeout,
    /// The provider answered with an error or an unusable payload.
    ProviderError(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoProvider => write!(f, "no provider configured"),
            FallbackReason::Timeout => write!(f, "provider timed out"),
            FallbackReason::ProviderError(msg) => write!(f, "provider failed: {msg}"),
        }
    }
}

/// Which strategy produced a stage's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Generative,
    Deterministic(FallbackReason),
}

/// A stage output tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    pub fn generative(value: T) -> Self {
        Self {
            value,
            source: Source::Generative,
        }
    }

    pub fn deterministic(value: T, reason: FallbackReason) -> Self {
        Self {
            value,
            source: Source::Deterministic(reason),
        }
    }

    pub fn is_generative(&self) -> bool {
        self.source == Source::Generative
    }
}

/// Awaits `attempt` for at most `timeout`; on error or timeout returns
/// `fallback()` instead. Dropping the attempt on timeout releases whatever
/// resources it holds.
pub async fn run_with_fallback<T, Fut, F>(
    stage: &'static str,
    timeout: Duration,
    attempt: Fut,
    fallback: F,
) -> Resolved<T>
where
    Fut: Future<Output = Result<T, LlmError>>,
    F: FnOnce() -> T,
{
    let reason = match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(value)) => {
            debug!("{stage}: generative strategy succeeded");
            return Resolved::generative(value);
        }
        Ok(Err(e)) => FallbackReason::ProviderError(e.to_string()),
        Err(_) => FallbackReason::Timeout,
    };

    warn!("{stage}: falling back to keyword strategy ({reason})");
    Resolved::deterministic(fallback(), reason)
}
