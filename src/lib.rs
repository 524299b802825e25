pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::history::ChatHistory;
use crate::application::portfolio::PortfolioUseCase;
use crate::application::stock_query::{StockQueryDeps, StockQueryUseCase};
use crate::config::{Config, DistanceMetric, EmbeddingBackend, PipelineOptions};
use crate::domain::entities::holding::Holding;
use crate::domain::entities::report::{PortfolioReport, QueryReport};
use crate::domain::error::DomainError;
use crate::domain::ports::chart_port::ChartRenderer;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::llm_port::LanguageModel;
use crate::domain::ports::market_data::MarketDataProvider;
use crate::domain::ports::news_source::NewsSource;
use crate::domain::ports::sentiment_port::SentimentClassifier;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::values::risk::RiskAppetite;
use crate::infrastructure::chart::svg::SvgChartRenderer;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::huggingface::HuggingFaceProvider;
use crate::infrastructure::embeddings::noop::NoopProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::llm::gemini::GeminiClient;
use crate::infrastructure::llm::openai_compat::OpenAiCompatibleClient;
use crate::infrastructure::market::yahoo::YahooChartClient;
use crate::infrastructure::news::newsapi::NewsApiClient;
use crate::infrastructure::sentiment::huggingface::HuggingFaceSentiment;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The external services both pipelines are wired to.
#[derive(Clone)]
pub struct Providers {
    /// Summaries, insights and portfolio advice.
    pub llm: Arc<dyn LanguageModel>,
    /// Symbol extraction, run at temperature 0.
    pub extractor: Arc<dyn LanguageModel>,
    pub market: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsSource>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub charts: Arc<dyn ChartRenderer>,
}

pub struct StockInsights {
    stock_uc: StockQueryUseCase,
    portfolio_uc: PortfolioUseCase,
    history: Arc<ChatHistory>,
    vector_store: Arc<dyn VectorStore>,
}

impl StockInsights {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let llm = OpenAiCompatibleClient::new(
            config.openrouter_api_key.clone(),
            config.llm_model.clone(),
            config.llm_base_url.clone(),
            config.llm_temperature,
        );

        let extractor: Arc<dyn LanguageModel> = match &config.gemini_api_key {
            Some(key) => Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                0.0,
            )),
            None => Arc::new(llm.with_temperature(0.0)),
        };

        let embedder: Arc<dyn EmbeddingProvider> = match config.embedding_backend {
            EmbeddingBackend::HuggingFace => Arc::new(HuggingFaceProvider::new(
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
                config.hf_inference_url.clone(),
            )),
            EmbeddingBackend::OpenAi => Arc::new(OpenAiProvider::new(
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
                config.embedding_base_url.clone(),
            )),
            EmbeddingBackend::Hashing => Arc::new(HashingProvider::default()),
            EmbeddingBackend::Noop => Arc::new(NoopProvider),
        };
        info!(
            model = %config.llm_model,
            extractor = extractor.name(),
            embeddings = ?config.embedding_backend,
            db = %config.db_path,
            "initializing providers"
        );

        let providers = Providers {
            llm: Arc::new(llm),
            extractor,
            market: Arc::new(YahooChartClient::new(config.yahoo_base_url.clone())),
            news: Arc::new(NewsApiClient::new(
                config.newsapi_key.clone(),
                config.newsapi_url.clone(),
                config.news_page_size,
            )),
            embedder,
            sentiment: Arc::new(HuggingFaceSentiment::new(
                config.hf_api_token.clone(),
                config.sentiment_model.clone(),
                config.hf_inference_url.clone(),
            )),
            charts: Arc::new(SvgChartRenderer),
        };

        Self::with_providers(&config.db_path, providers, config.pipeline.clone(), config.distance)
    }

    pub fn with_providers(
        db_path: &str,
        providers: Providers,
        options: PipelineOptions,
        distance: DistanceMetric,
    ) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path).map_err(|e| DomainError::VectorStore(format!("DB error: {e}")))?;
        run_migrations(&conn)?;
        let vector_store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(conn, distance));

        let provider_dim = providers.embedder.dimension();
        if provider_dim > 0 {
            if let Ok(Some(stored_dim)) = vector_store.get_stored_dimension() {
                if stored_dim != provider_dim {
                    warn!(
                        stored_dim,
                        provider_dim,
                        "stored news vectors have a different dimension than the embedding provider; they will not match"
                    );
                }
            }
        }

        let history = Arc::new(ChatHistory::new(options.history_limit));
        let deps = StockQueryDeps {
            llm: providers.llm.clone(),
            extractor: providers.extractor,
            market: providers.market,
            news: providers.news,
            embedder: providers.embedder,
            store: vector_store.clone(),
            sentiment: providers.sentiment,
            charts: providers.charts.clone(),
        };

        Ok(Self {
            stock_uc: StockQueryUseCase::new(deps, &options, history.clone()),
            portfolio_uc: PortfolioUseCase::new(providers.llm, providers.charts, options.llm_pause),
            history,
            vector_store,
        })
    }

    pub async fn ask(&self, user_query: &str) -> Result<QueryReport, DomainError> {
        self.stock_uc.execute(user_query).await
    }

    /// Runs every query in order, continuing past failures.
    pub async fn ask_all(&self, queries: &[String]) -> Vec<Result<QueryReport, DomainError>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            let result = self.ask(query).await;
            if let Err(e) = &result {
                error!(query = %query, "query failed: {e}");
            }
            results.push(result);
        }
        results
    }

    pub fn history(&self) -> Vec<QueryReport> {
        self.history.list()
    }

    pub fn clear_history(&self) -> usize {
        self.history.clear()
    }

    pub async fn analyze_portfolio(
        &self,
        holdings: Vec<Holding>,
        risk: RiskAppetite,
    ) -> Result<PortfolioReport, DomainError> {
        self.portfolio_uc.execute(holdings, risk).await
    }

    /// Number of news articles held in the vector store.
    pub fn stored_articles(&self) -> Result<usize, DomainError> {
        self.vector_store.count()
    }

    pub fn stock_steps(&self) -> Vec<&'static str> {
        self.stock_uc.step_names()
    }

    pub fn portfolio_steps(&self) -> Vec<&'static str> {
        self.portfolio_uc.step_names()
    }
}
