use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::Serialize;

/// Sentence embeddings through the Hugging Face feature-extraction pipeline.
pub struct HuggingFaceProvider {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct FeatureRequest<'a> {
    inputs: &'a [String],
}

impl HuggingFaceProvider {
    pub fn new(api_token: String, model: Option<String>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
            model: model.unwrap_or_else(|| "sentence-transformers/all-MiniLM-L6-v2".to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "sentence-transformers/all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L12-v2" => 384,
            "sentence-transformers/all-mpnet-base-v2" => 768,
            _ => 384,
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let url = format!("{}/models/{}/pipeline/feature-extraction", self.base_url, self.model);
        let mut req = self.client.post(&url).json(&FeatureRequest { inputs: texts });
        if !self.api_token.is_empty() {
            req = req.bearer_auth(&self.api_token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("Inference API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Embedding(format!("Inference API {status}: {body}")));
        }

        let vectors: Vec<Vec<f32>> = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("Parse error: {e}")))?;

        if vectors.len() != texts.len() {
            return Err(DomainError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        Self::model_dimension(&self.model)
    }
}
