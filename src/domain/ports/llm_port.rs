use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Single-turn text completion. Sampling settings belong to the client instance.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier for logging.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
