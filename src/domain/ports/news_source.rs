use crate::domain::entities::news_article::NewsArticle;
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Latest English articles matching `query`, newest first.
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, DomainError>;
}
