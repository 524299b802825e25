use crate::domain::entities::news_article::NewsArticle;
use crate::domain::error::DomainError;
use crate::domain::ports::news_source::NewsSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

/// NewsAPI.org `/v2/everything` search.
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(api_key: String, base_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("stock-insights/0.1")
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.clamp(1, 100),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RawSource {
    name: Option<String>,
}

/// Articles without a URL cannot be stored or linked, so they are skipped.
fn parse_articles(body: &str) -> Result<Vec<NewsArticle>, DomainError> {
    let data: EverythingResponse =
        serde_json::from_str(body).map_err(|e| DomainError::Parse(format!("NewsAPI: {e}")))?;

    Ok(data
        .articles
        .into_iter()
        .filter_map(|a| {
            let url = a.url.filter(|u| !u.trim().is_empty())?;
            Some(NewsArticle {
                url,
                title: a.title.unwrap_or_else(|| "Untitled".to_string()),
                description: a.description,
                content: a.content,
                source: a.source.and_then(|s| s.name),
                published_at: a
                    .published_at
                    .and_then(|p| DateTime::parse_from_rfc3339(&p).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            })
        })
        .collect())
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, DomainError> {
        if self.api_key.is_empty() {
            return Err(DomainError::Config("NEWSAPI_KEY is not set".into()));
        }

        let url = format!("{}/v2/everything", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query.to_string()),
                ("language", "en".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", self.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::News(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::News(format!("NewsAPI {status}: {body}")));
        }

        let body = resp.text().await.map_err(|e| DomainError::News(e.to_string()))?;
        let articles = parse_articles(&body)?;
        debug!(query, articles = articles.len(), "fetched news");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const SAMPLE: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": null, "name": "Economic Times"},
                "author": "Staff",
                "title": "Infosys wins large deal",
                "description": "The IT major signed a multi-year contract.",
                "url": "https://example.com/infy-deal",
                "publishedAt": "2025-03-14T09:30:00Z",
                "content": "Infosys said on Friday it won a deal. Shares rose 2%."
            },
            {
                "source": {"id": null, "name": "Mint"},
                "title": null,
                "description": null,
                "url": "https://example.com/untitled",
                "publishedAt": "not a date",
                "content": null
            },
            {
                "source": null,
                "title": "Missing url",
                "url": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_articles() {
        let articles = parse_articles(SAMPLE).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source.as_deref(), Some("Economic Times"));
        assert!(articles[0].published_at.is_some());
        assert_eq!(articles[1].title, "Untitled");
        assert!(articles[1].published_at.is_none());
        assert!(articles[1].embeddable_text().is_none());
    }

    #[tokio::test]
    async fn test_search_sends_expected_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/everything")
            .match_header("x-api-key", "news-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "infosys".into()),
                Matcher::UrlEncoded("language".into(), "en".into()),
                Matcher::UrlEncoded("sortBy".into(), "publishedAt".into()),
                Matcher::UrlEncoded("pageSize".into(), "100".into()),
            ]))
            .with_status(200)
            .with_body(SAMPLE)
            .create_async()
            .await;

        let client = NewsApiClient::new("news-key".into(), server.url(), 100);
        let articles = client.search("infosys").await.unwrap();
        assert_eq!(articles.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status":"error","code":"apiKeyInvalid"}"#)
            .create_async()
            .await;

        let client = NewsApiClient::new("bad".into(), server.url(), 100);
        assert!(matches!(client.search("x").await, Err(DomainError::News(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = NewsApiClient::new(String::new(), "http://127.0.0.1:9", 100);
        assert!(matches!(client.search("x").await, Err(DomainError::Config(_))));
    }
}
