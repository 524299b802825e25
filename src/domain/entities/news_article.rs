use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsArticle {
    pub fn new(url: impl Into<String>, title: impl Into<String>, content: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: None,
            content,
            source: None,
            published_at: None,
        }
    }

    /// Text used for embedding: the article content, or its description when
    /// the provider returned no content. `None` when neither has any text.
    pub fn embeddable_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.description.as_deref().filter(|d| !d.trim().is_empty()))
    }
}

/// A stored article returned by similarity search, nearest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarArticle {
    pub url: String,
    pub title: String,
    pub content: String,
    pub distance: f64,
}
