use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No stock or company name found in query: {0}")]
    NoSymbol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("News error: {0}")]
    News(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl DomainError {
    /// True when the caller sent something unusable, as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::InvalidInput(_) | DomainError::NoSymbol(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::VectorStore(e.to_string())
    }
}
