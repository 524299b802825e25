//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Everything except API keys has a default.

use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::DomainError;

pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference";
pub const DEFAULT_SENTIMENT_MODEL: &str = "yiyanghkust/finbert-tone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    HuggingFace,
    OpenAi,
    Hashing,
    Noop,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(EmbeddingBackend::HuggingFace),
            "openai" => Ok(EmbeddingBackend::OpenAi),
            "hashing" | "local" => Ok(EmbeddingBackend::Hashing),
            "noop" | "none" => Ok(EmbeddingBackend::Noop),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Squared euclidean distance.
    #[default]
    SquaredL2,
    /// `1 - cosine similarity`.
    Cosine,
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l2" | "squared_l2" | "euclidean" => Ok(DistanceMetric::SquaredL2),
            "cosine" => Ok(DistanceMetric::Cosine),
            _ => Err(format!("Unknown vector distance: {s}")),
        }
    }
}

/// Tunables of the two pipelines, independent of which providers are wired in.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub exchange_suffix: String,
    pub history_days: u32,
    pub chart_lookback_days: u32,
    pub chart_points: usize,
    pub similar_articles: usize,
    /// Pause between the two diversification prompts.
    pub llm_pause: Duration,
    pub history_limit: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            exchange_suffix: ".NS".into(),
            history_days: 7,
            chart_lookback_days: 60,
            chart_points: 30,
            similar_articles: 7,
            llm_pause: Duration::from_secs(6),
            history_limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub newsapi_key: String,
    pub newsapi_url: String,
    pub news_page_size: u32,
    pub yahoo_base_url: String,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_api_key: String,
    pub embedding_model: Option<String>,
    pub embedding_base_url: Option<String>,
    pub hf_api_token: String,
    pub hf_inference_url: String,
    pub sentiment_model: String,
    pub db_path: String,
    pub distance: DistanceMetric,
    pub pipeline: PipelineOptions,
}

impl Config {
    /// Loads `.env` (if any) and reads the environment.
    pub fn from_env() -> Result<Self, DomainError> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let hf_api_token = get("HF_API_TOKEN").unwrap_or_default();
        let defaults = PipelineOptions::default();

        Ok(Self {
            openrouter_api_key: get("OPENROUTER_API_KEY").unwrap_or_default(),
            llm_base_url: or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_model: or("LLM_MODEL", DEFAULT_LLM_MODEL),
            llm_temperature: parse_or(get("LLM_TEMPERATURE"), "LLM_TEMPERATURE", 0.7)?,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_base_url: or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_model: or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            newsapi_key: get("NEWSAPI_KEY").or_else(|| get("NEWS_API_KEY")).unwrap_or_default(),
            newsapi_url: or("NEWSAPI_URL", DEFAULT_NEWSAPI_URL),
            news_page_size: parse_or(get("NEWS_PAGE_SIZE"), "NEWS_PAGE_SIZE", 100)?,
            yahoo_base_url: or("YAHOO_BASE_URL", DEFAULT_YAHOO_BASE_URL),
            embedding_backend: parse_or(get("EMBEDDING_PROVIDER"), "EMBEDDING_PROVIDER", EmbeddingBackend::HuggingFace)?,
            embedding_api_key: get("EMBEDDING_API_KEY").unwrap_or_else(|| hf_api_token.clone()),
            embedding_model: get("EMBEDDING_MODEL"),
            embedding_base_url: get("EMBEDDING_BASE_URL"),
            hf_inference_url: or("HF_INFERENCE_URL", DEFAULT_HF_INFERENCE_URL),
            hf_api_token,
            sentiment_model: or("SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL),
            db_path: or("STOCK_INSIGHTS_DB", ":memory:"),
            distance: parse_or(get("VECTOR_DISTANCE"), "VECTOR_DISTANCE", DistanceMetric::default())?,
            pipeline: PipelineOptions {
                exchange_suffix: get("EXCHANGE_SUFFIX").unwrap_or(defaults.exchange_suffix),
                similar_articles: parse_or(get("SIMILAR_ARTICLES"), "SIMILAR_ARTICLES", defaults.similar_articles)?,
                llm_pause: Duration::from_secs(parse_or(
                    get("PORTFOLIO_LLM_PAUSE_SECS"),
                    "PORTFOLIO_LLM_PAUSE_SECS",
                    defaults.llm_pause.as_secs(),
                )?),
                history_limit: get("HISTORY_LIMIT")
                    .map(|v| parse_value::<usize>(&v, "HISTORY_LIMIT"))
                    .transpose()?,
                ..defaults
            },
        })
    }
}

fn parse_value<T>(raw: &str, key: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DomainError::Config(format!("{key}={raw}: {e}")))
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => parse_value(&v, key),
        None => Ok(default),
    }
}
