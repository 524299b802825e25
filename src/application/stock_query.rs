//! Stock query pipeline: symbol extraction → market data → chart → news →
//! embeddings → similarity search → sentiment → summary → insights.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::history::ChatHistory;
use crate::application::prompts;
use crate::application::workflow::{Step, Workflow};
use crate::config::PipelineOptions;
use crate::domain::entities::news_article::{NewsArticle, SimilarArticle};
use crate::domain::entities::price_bar::PriceBar;
use crate::domain::entities::report::QueryReport;
use crate::domain::error::DomainError;
use crate::domain::ports::chart_port::{ChartRenderer, LineChart};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::ports::llm_port::LanguageModel;
use crate::domain::ports::market_data::MarketDataProvider;
use crate::domain::ports::news_source::NewsSource;
use crate::domain::ports::sentiment_port::SentimentClassifier;
use crate::domain::ports::vector_store::{StoredDocument, VectorStore};
use crate::domain::values::sentiment::{round4, snippet, SentimentResult};
use crate::domain::values::symbol::{normalize_symbol, parse_extracted_name};

/// Shared state threaded through the stock query steps.
#[derive(Debug, Clone, Default)]
pub struct StockWorkflowState {
    pub user_query: String,
    pub stock_symbol: Option<String>,
    pub stock_data: Vec<PriceBar>,
    pub chart_base64: String,
    pub news_articles: Vec<NewsArticle>,
    pub similar_articles: Vec<SimilarArticle>,
    pub sentiment_results: Vec<SentimentResult>,
    pub news_summary: String,
    pub insights: String,
}

impl StockWorkflowState {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            ..Default::default()
        }
    }

    fn symbol(&self) -> Result<&str, DomainError> {
        self.stock_symbol
            .as_deref()
            .ok_or_else(|| DomainError::NoSymbol(self.user_query.clone()))
    }
}

pub struct ExtractSymbol {
    llm: Arc<dyn LanguageModel>,
}

#[async_trait]
impl Step<StockWorkflowState> for ExtractSymbol {
    fn name(&self) -> &'static str {
        "extract_stock_symbol"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        if state.user_query.trim().is_empty() {
            return Err(DomainError::InvalidInput("Query must be a non-empty string".into()));
        }
        state.stock_symbol = match self.llm.complete(&prompts::extract_symbol(&state.user_query)).await {
            Ok(reply) => parse_extracted_name(&reply),
            Err(e) => {
                warn!(model = self.llm.name(), "Symbol extraction failed: {e}");
                None
            }
        };
        match &state.stock_symbol {
            Some(s) => info!(symbol = %s, "extracted stock name"),
            None => info!("no stock name found in query"),
        }
        Ok(())
    }
}

pub struct FetchStockData {
    market: Arc<dyn MarketDataProvider>,
    suffix: String,
    days: u32,
}

#[async_trait]
impl Step<StockWorkflowState> for FetchStockData {
    fn name(&self) -> &'static str {
        "fetch_stock_data"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let ticker = normalize_symbol(state.symbol()?, &self.suffix);
        let data = self.market.daily_history(&ticker, self.days).await.unwrap_or_else(|e| {
            warn!(provider = self.market.name(), "Error fetching stock data for {ticker}: {e}");
            vec![]
        });
        if data.is_empty() {
            return Err(DomainError::NotFound(format!("No stock data found for symbol: {ticker}")));
        }
        state.stock_data = data;
        Ok(())
    }
}

pub struct GenerateChart {
    market: Arc<dyn MarketDataProvider>,
    charts: Arc<dyn ChartRenderer>,
    suffix: String,
    lookback_days: u32,
    points: usize,
}

impl GenerateChart {
    async fn render(&self, raw_symbol: &str) -> Result<String, DomainError> {
        let ticker = normalize_symbol(raw_symbol, &self.suffix);
        let history = self.market.daily_history(&ticker, self.lookback_days).await?;
        if history.is_empty() {
            info!("No chart data found for {ticker}");
            return Ok(String::new());
        }
        let tail = &history[history.len().saturating_sub(self.points)..];
        let spec = LineChart {
            title: format!("{ticker} - Last {} Closing Prices", self.points),
            x_label: "Date".into(),
            y_label: "Closing Price (INR)".into(),
            labels: tail.iter().map(|b| b.date.format("%Y-%m-%d").to_string()).collect(),
            values: tail.iter().map(|b| b.close).collect(),
        };
        let bytes = self.charts.line_chart(&spec)?;
        Ok(BASE64.encode(bytes))
    }
}

#[async_trait]
impl Step<StockWorkflowState> for GenerateChart {
    fn name(&self) -> &'static str {
        "generate_chart"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let symbol = state.symbol()?.to_string();
        state.chart_base64 = self.render(&symbol).await.unwrap_or_else(|e| {
            warn!("Chart generation failed for {symbol}: {e}");
            String::new()
        });
        Ok(())
    }
}

pub struct FetchNews {
    news: Arc<dyn NewsSource>,
}

#[async_trait]
impl Step<StockWorkflowState> for FetchNews {
    fn name(&self) -> &'static str {
        "fetch_news"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let symbol = state.symbol()?.to_string();
        state.news_articles = self.news.search(&symbol).await.unwrap_or_else(|e| {
            warn!(source = self.news.name(), "Unable to fetch news for {symbol}: {e}");
            vec![]
        });
        info!(articles = state.news_articles.len(), "fetched news articles");
        Ok(())
    }
}

pub struct EmbedNews {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

#[async_trait]
impl Step<StockWorkflowState> for EmbedNews {
    fn name(&self) -> &'static str {
        "embed_news"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let docs: Vec<StoredDocument> = state
            .news_articles
            .iter()
            .filter_map(|a| {
                let text = a.embeddable_text()?;
                seen.insert(a.url.clone()).then(|| StoredDocument {
                    id: a.url.clone(),
                    title: a.title.clone(),
                    content: text.to_string(),
                })
            })
            .collect();

        if docs.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = docs.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed(&texts, InputType::Document).await?;
        if vectors.len() != docs.len() {
            return Err(DomainError::Embedding(format!(
                "Expected {} embeddings, got {}",
                docs.len(),
                vectors.len()
            )));
        }

        let mut stored = 0;
        for (doc, vector) in docs.iter().zip(vectors.iter()) {
            if vector.is_empty() {
                continue;
            }
            self.store.upsert(doc, vector)?;
            stored += 1;
        }
        debug!(candidates = docs.len(), stored, "embedded news articles");
        Ok(())
    }
}

pub struct SimilaritySearch {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    limit: usize,
}

#[async_trait]
impl Step<StockWorkflowState> for SimilaritySearch {
    fn name(&self) -> &'static str {
        "similarity_search"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let vectors = self
            .embedder
            .embed(&[state.user_query.clone()], InputType::Query)
            .await?;
        let Some(query_vec) = vectors.first() else {
            state.similar_articles = vec![];
            return Ok(());
        };

        state.similar_articles = self
            .store
            .nearest(query_vec, self.limit)?
            .into_iter()
            .map(|hit| SimilarArticle {
                url: hit.document.id,
                title: if hit.document.title.is_empty() {
                    "Untitled".to_string()
                } else {
                    hit.document.title
                },
                content: hit.document.content,
                distance: hit.distance,
            })
            .collect();
        Ok(())
    }
}

pub struct SentimentAnalysis {
    classifier: Arc<dyn SentimentClassifier>,
}

#[async_trait]
impl Step<StockWorkflowState> for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        let mut results = Vec::with_capacity(state.similar_articles.len());
        for article in &state.similar_articles {
            let score = self.classifier.classify(&article.content).await.map_err(|e| {
                warn!(classifier = self.classifier.name(), url = %article.url, "Sentiment failed: {e}");
                e
            })?;
            results.push(SentimentResult {
                title: article.title.clone(),
                snippet: snippet(&article.content),
                url: article.url.clone(),
                sentiment: score.label,
                score: round4(score.score),
            });
        }
        state.sentiment_results = results;
        Ok(())
    }
}

pub struct SummarizeNews {
    llm: Arc<dyn LanguageModel>,
}

#[async_trait]
impl Step<StockWorkflowState> for SummarizeNews {
    fn name(&self) -> &'static str {
        "summarize_news"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        if state.similar_articles.is_empty() {
            state.news_summary = String::new();
            return Ok(());
        }
        state.news_summary = self.llm.complete(&prompts::news_summary(&state.similar_articles)).await?;
        Ok(())
    }
}

pub struct GenerateInsights {
    llm: Arc<dyn LanguageModel>,
}

#[async_trait]
impl Step<StockWorkflowState> for GenerateInsights {
    fn name(&self) -> &'static str {
        "generate_insights"
    }

    async fn run(&self, state: &mut StockWorkflowState) -> Result<(), DomainError> {
        state.insights = self
            .llm
            .complete(&prompts::stock_insights(&state.stock_data, &state.news_summary))
            .await?;
        Ok(())
    }
}

/// Ports the stock query pipeline calls out to.
#[derive(Clone)]
pub struct StockQueryDeps {
    pub llm: Arc<dyn LanguageModel>,
    pub extractor: Arc<dyn LanguageModel>,
    pub market: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsSource>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn VectorStore>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub charts: Arc<dyn ChartRenderer>,
}

pub fn build_workflow(deps: &StockQueryDeps, opts: &PipelineOptions) -> Workflow<StockWorkflowState> {
    Workflow::new("stock_query")
        .then(ExtractSymbol {
            llm: deps.extractor.clone(),
        })
        .then(FetchStockData {
            market: deps.market.clone(),
            suffix: opts.exchange_suffix.clone(),
            days: opts.history_days,
        })
        .then(GenerateChart {
            market: deps.market.clone(),
            charts: deps.charts.clone(),
            suffix: opts.exchange_suffix.clone(),
            lookback_days: opts.chart_lookback_days,
            points: opts.chart_points,
        })
        .then(FetchNews {
            news: deps.news.clone(),
        })
        .then(EmbedNews {
            embedder: deps.embedder.clone(),
            store: deps.store.clone(),
        })
        .then(SimilaritySearch {
            embedder: deps.embedder.clone(),
            store: deps.store.clone(),
            limit: opts.similar_articles,
        })
        .then(SentimentAnalysis {
            classifier: deps.sentiment.clone(),
        })
        .then(SummarizeNews { llm: deps.llm.clone() })
        .then(GenerateInsights { llm: deps.llm.clone() })
}

pub struct StockQueryUseCase {
    workflow: Workflow<StockWorkflowState>,
    history: Arc<ChatHistory>,
    chart_mime: &'static str,
}

impl StockQueryUseCase {
    pub fn new(deps: StockQueryDeps, opts: &PipelineOptions, history: Arc<ChatHistory>) -> Self {
        Self {
            workflow: build_workflow(&deps, opts),
            history,
            chart_mime: deps.charts.mime(),
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.workflow.step_names()
    }

    /// Runs the pipeline and records the report in chat history.
    pub async fn execute(&self, user_query: &str) -> Result<QueryReport, DomainError> {
        let state = self.workflow.invoke(StockWorkflowState::new(user_query)).await?;

        let report = QueryReport {
            id: uuid::Uuid::new_v4().to_string(),
            asked_at: Utc::now(),
            query: user_query.to_string(),
            stock_symbol: state.stock_symbol.unwrap_or_else(|| "N/A".to_string()),
            stock_data: state.stock_data,
            chart_base64: state.chart_base64,
            chart_mime: self.chart_mime.to_string(),
            news_summary: state.news_summary,
            insights: state.insights,
            sentiment_results: state.sentiment_results,
        };
        self.history.push(report.clone());
        Ok(report)
    }
}
