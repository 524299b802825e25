use crate::domain::error::DomainError;
use crate::domain::values::sentiment::SentimentScore;
use async_trait::async_trait;

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Most probable label for `text` and its probability.
    async fn classify(&self, text: &str) -> Result<SentimentScore, DomainError>;
}
