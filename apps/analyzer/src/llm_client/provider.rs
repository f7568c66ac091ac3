//! The provider capability handed to analysis stages.
//!
//! Stages never hold an `LlmClient` directly; they receive an
//! `Arc<dyn GenerativeTextProvider>` at construction so tests and alternative
//! backends can be swapped in without touching the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{LlmClient, LlmError};

/// A single prompt sent to a provider.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text-in, text-out generative capability. Implementations may fail or hang;
/// callers bound every call with a timeout.
#[async_trait]
pub trait GenerativeTextProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &PromptRequest<'_>) -> Result<String, LlmError>;
}

#[async_trait]
impl GenerativeTextProvider for LlmClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &PromptRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Caps the number of in-flight calls to the wrapped provider.
///
/// The permit is held for exactly the lifetime of one `complete` future, so it
/// is returned on success, on error, and when the caller drops the future on
/// timeout or cancellation.
pub struct ConcurrencyLimited<P> {
    inner: P,
    permits: Arc<Semaphore>,
}

impl<P> ConcurrencyLimited<P> {
    pub fn new(inner: P, max_concurrent: usize) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl<P: GenerativeTextProvider> GenerativeTextProvider for ConcurrencyLimited<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &PromptRequest<'_>) -> Result<String, LlmError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| LlmError::Unavailable)?;
        self.inner.complete(request).await
    }
}
