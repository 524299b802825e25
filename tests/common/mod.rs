//! Shared test helpers: scripted providers wired into an in-memory instance.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stock_insights::config::{DistanceMetric, PipelineOptions};
use stock_insights::domain::entities::news_article::NewsArticle;
use stock_insights::domain::entities::price_bar::PriceBar;
use stock_insights::domain::error::DomainError;
use stock_insights::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use stock_insights::domain::ports::llm_port::LanguageModel;
use stock_insights::domain::ports::market_data::MarketDataProvider;
use stock_insights::domain::ports::news_source::NewsSource;
use stock_insights::domain::ports::sentiment_port::SentimentClassifier;
use stock_insights::domain::values::sentiment::{SentimentLabel, SentimentScore};
use stock_insights::infrastructure::chart::svg::SvgChartRenderer;
use stock_insights::infrastructure::embeddings::hashing::HashingProvider;
use stock_insights::{Providers, StockInsights};

pub const SUMMARY: &str = "- Tata Motors sales rose\n- EV demand strong";
pub const OUTLOOK: &str = "Outlook is positive. Suggested action: hold.";
pub const PORTFOLIO_INSIGHTS: &str = "- Solid IT exposure";
pub const RECOMMENDATIONS: &str = "- Consider gilt funds (~7% 1Y)";

/// Answers by prompt type and records every prompt it receives.
pub struct ScriptedLlm {
    pub extraction_reply: Option<String>,
    pub sectors: HashMap<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(extraction_reply: Option<&str>) -> Self {
        Self {
            extraction_reply: extraction_reply.map(String::from),
            sectors: HashMap::new(),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn with_sector(mut self, symbol: &str, sector: &str) -> Self {
        self.sectors.insert(symbol.to_string(), sector.to_string());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(needle)).count()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains("Extract ONLY the stock name") {
            return self
                .extraction_reply
                .clone()
                .ok_or_else(|| DomainError::Llm("extraction unavailable".into()));
        }
        if prompt.contains("Identify the SECTOR") {
            let reply = self
                .sectors
                .iter()
                .find(|(symbol, _)| prompt.contains(&format!("symbol: {symbol}.")))
                .map(|(_, sector)| sector.clone())
                .unwrap_or_default();
            return Ok(reply);
        }
        if prompt.contains("Summarize the following news") {
            return Ok(SUMMARY.to_string());
        }
        if prompt.contains("7-day stock data") {
            return Ok(OUTLOOK.to_string());
        }
        if prompt.contains("diversification recommendations") {
            return Ok(RECOMMENDATIONS.to_string());
        }
        if prompt.contains("positive insights") {
            return Ok(PORTFOLIO_INSIGHTS.to_string());
        }
        Err(DomainError::Llm(format!("unexpected prompt: {prompt}")))
    }
}

/// Serves a fixed daily series for the tickers it knows.
pub struct FakeMarket {
    pub series: HashMap<String, Vec<PriceBar>>,
    pub failing_days: Option<u32>,
    pub requests: Mutex<Vec<(String, u32)>>,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            failing_days: None,
            requests: Mutex::new(vec![]),
        }
    }

    /// Requests for exactly `days` days fail; others are served as usual.
    pub fn failing_for(mut self, days: u32) -> Self {
        self.failing_days = Some(days);
        self
    }

    pub fn with_series(mut self, ticker: &str, days: usize) -> Self {
        self.series.insert(ticker.to_string(), bars(days));
        self
    }

    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn bars(days: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let close = 900.0 + i as f64;
            PriceBar::new(
                start + chrono::Duration::days(i as i64),
                close - 2.0,
                close + 3.0,
                close - 4.0,
                close,
                1_000_000 + i as u64,
            )
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    fn name(&self) -> &str {
        "fake-market"
    }

    async fn daily_history(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, DomainError> {
        self.requests.lock().unwrap().push((symbol.to_string(), days));
        if self.failing_days == Some(days) {
            return Err(DomainError::MarketData(format!("{symbol}: upstream timeout")));
        }
        let all = self.series.get(symbol).cloned().unwrap_or_default();
        let keep = (days as usize).min(all.len());
        Ok(all[all.len() - keep..].to_vec())
    }
}

pub struct FakeNews {
    pub articles: Vec<NewsArticle>,
    pub fail: bool,
    pub queries: Mutex<Vec<String>>,
}

impl FakeNews {
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            fail: false,
            queries: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: vec![],
            fail: true,
            queries: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl NewsSource for FakeNews {
    fn name(&self) -> &str {
        "fake-news"
    }

    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, DomainError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(DomainError::News("HTTP 500".into()));
        }
        Ok(self.articles.clone())
    }
}

pub fn article(url: &str, title: &str, content: &str) -> NewsArticle {
    NewsArticle::new(url, title, Some(content.to_string()))
}

pub fn tata_articles() -> Vec<NewsArticle> {
    vec![
        article(
            "https://news.example/1",
            "Tata Motors sales gain",
            "Tata Motors posted a strong gain in sales. EV demand was robust. Analysts expect more.",
        ),
        article(
            "https://news.example/2",
            "Tata Motors faces loss in UK unit",
            "Jaguar Land Rover reported a loss. Margins shrank.",
        ),
        article("https://news.example/3", "Monsoon update", "Rainfall was normal this season."),
    ]
}

/// Keyword classifier: "gain" is positive, "loss" negative, anything else neutral.
pub struct KeywordSentiment;

#[async_trait]
impl SentimentClassifier for KeywordSentiment {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, text: &str) -> Result<SentimentScore, DomainError> {
        let lower = text.to_lowercase();
        let label = if lower.contains("gain") {
            SentimentLabel::Positive
        } else if lower.contains("loss") {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Ok(SentimentScore { label, score: 0.876543 })
    }
}

pub struct FailingSentiment;

#[async_trait]
impl SentimentClassifier for FailingSentiment {
    fn name(&self) -> &str {
        "failing"
    }

    async fn classify(&self, _text: &str) -> Result<SentimentScore, DomainError> {
        Err(DomainError::Sentiment("model loading".into()))
    }
}

/// Hashing embedder that records document batches. `short` drops the last
/// vector of every document batch.
pub struct RecordingEmbedder {
    inner: HashingProvider,
    pub short: bool,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl RecordingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashingProvider::default(),
            short: false,
            batches: Mutex::new(vec![]),
        }
    }

    pub fn short() -> Self {
        Self { short: true, ..Self::new() }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingEmbedder {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = self.inner.embed(texts, input_type).await?;
        if let InputType::Document = input_type {
            self.batches.lock().unwrap().push(texts.to_vec());
            if self.short {
                vectors.pop();
            }
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

pub fn options() -> PipelineOptions {
    PipelineOptions {
        llm_pause: Duration::ZERO,
        ..PipelineOptions::default()
    }
}

pub struct Harness {
    pub app: StockInsights,
    pub llm: Arc<ScriptedLlm>,
    pub market: Arc<FakeMarket>,
    pub news: Arc<FakeNews>,
    pub embedder: Arc<RecordingEmbedder>,
}

pub fn build(
    llm: ScriptedLlm,
    market: FakeMarket,
    news: FakeNews,
    sentiment: Arc<dyn SentimentClassifier>,
    opts: PipelineOptions,
) -> Harness {
    build_with_embedder(llm, market, news, sentiment, opts, RecordingEmbedder::new())
}

pub fn build_with_embedder(
    llm: ScriptedLlm,
    market: FakeMarket,
    news: FakeNews,
    sentiment: Arc<dyn SentimentClassifier>,
    opts: PipelineOptions,
    embedder: RecordingEmbedder,
) -> Harness {
    let llm = Arc::new(llm);
    let embedder = Arc::new(embedder);
    let market = Arc::new(market);
    let news = Arc::new(news);
    let providers = Providers {
        llm: llm.clone(),
        extractor: llm.clone(),
        market: market.clone(),
        news: news.clone(),
        embedder: embedder.clone(),
        sentiment,
        charts: Arc::new(SvgChartRenderer),
    };
    let app = StockInsights::with_providers(":memory:", providers, opts, DistanceMetric::SquaredL2).unwrap();
    Harness {
        app,
        llm,
        market,
        news,
        embedder,
    }
}

/// Tata Motors with 60 days of prices and three news articles.
pub fn setup() -> Harness {
    build(
        ScriptedLlm::new(Some("Tata Motors")),
        FakeMarket::new().with_series("TATAMOTORS.NS", 60),
        FakeNews::new(tata_articles()),
        Arc::new(KeywordSentiment),
        options(),
    )
}
