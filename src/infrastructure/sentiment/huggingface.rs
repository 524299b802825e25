use crate::domain::error::DomainError;
use crate::domain::ports::sentiment_port::SentimentClassifier;
use crate::domain::values::sentiment::{SentimentLabel, SentimentScore};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Upper bound on characters sent per classification; FinBERT reads at most
/// 512 tokens and the endpoint rejects much longer inputs.
const MAX_INPUT_CHARS: usize = 2000;

/// Text classification through the Hugging Face inference API (FinBERT tone by default).
pub struct HuggingFaceSentiment {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The endpoint answers either `[[{..}, ..]]` or `[{..}, ..]` depending on model config.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HuggingFaceSentiment {
    pub fn new(api_token: String, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn best_label(body: &str) -> Result<SentimentScore, DomainError> {
    let parsed: ClassifyResponse =
        serde_json::from_str(body).map_err(|e| DomainError::Parse(format!("Sentiment response: {e}")))?;
    let scores = match parsed {
        ClassifyResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
        ClassifyResponse::Flat(flat) => flat,
    };

    let top = scores
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| DomainError::Sentiment("Classifier returned no labels".into()))?;

    let label: SentimentLabel = top.label.parse().map_err(DomainError::Sentiment)?;
    Ok(SentimentScore {
        label,
        score: top.score,
    })
}

#[async_trait]
impl SentimentClassifier for HuggingFaceSentiment {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore, DomainError> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let mut req = self.client.post(&url).json(&ClassifyRequest {
            inputs: truncate_chars(text, MAX_INPUT_CHARS),
        });
        if !self.api_token.is_empty() {
            req = req.bearer_auth(&self.api_token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Sentiment(format!("Inference API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Sentiment(format!("Inference API {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::Sentiment(e.to_string()))?;
        best_label(&body)
    }
}
