//! Portfolio pipeline: sector classification, then diversification advice.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{info, warn};

use crate::application::prompts;
use crate::application::workflow::{Step, Workflow};
use crate::domain::entities::holding::{ClassifiedHolding, Holding};
use crate::domain::entities::report::PortfolioReport;
use crate::domain::error::DomainError;
use crate::domain::ports::chart_port::{ChartRenderer, PieChart};
use crate::domain::ports::llm_port::LanguageModel;
use crate::domain::values::risk::RiskAppetite;
use crate::domain::values::sector_breakdown::SectorBreakdown;

pub const UNKNOWN_SECTOR: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct PortfolioWorkflowState {
    pub holdings: Vec<Holding>,
    pub risk: RiskAppetite,
    pub classified: Vec<ClassifiedHolding>,
    pub sector_breakdown: SectorBreakdown,
    pub sector_chart_base64: String,
    pub ai_insights: String,
    pub recommendations: String,
}

impl PortfolioWorkflowState {
    pub fn new(holdings: Vec<Holding>, risk: RiskAppetite) -> Self {
        Self {
            holdings,
            risk,
            classified: vec![],
            sector_breakdown: SectorBreakdown::new(),
            sector_chart_base64: String::new(),
            ai_insights: String::new(),
            recommendations: String::new(),
        }
    }
}

/// Strips whitespace, quotes and a trailing period from an LLM sector reply.
pub fn clean_sector(reply: &str) -> String {
    let cleaned = reply
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();
    if cleaned.is_empty() {
        UNKNOWN_SECTOR.to_string()
    } else {
        cleaned.to_string()
    }
}

pub struct SectorAnalyzer {
    llm: Arc<dyn LanguageModel>,
    charts: Arc<dyn ChartRenderer>,
}

#[async_trait]
impl Step<PortfolioWorkflowState> for SectorAnalyzer {
    fn name(&self) -> &'static str {
        "sector_analyzer"
    }

    async fn run(&self, state: &mut PortfolioWorkflowState) -> Result<(), DomainError> {
        let mut classified = Vec::with_capacity(state.holdings.len());
        let mut breakdown = SectorBreakdown::new();

        for holding in &state.holdings {
            let reply = self.llm.complete(&prompts::sector_for(&holding.symbol)).await?;
            let sector = clean_sector(&reply);
            info!(symbol = %holding.symbol, sector = %sector, "classified holding");
            breakdown.add(&sector, holding.quantity);
            classified.push(ClassifiedHolding {
                symbol: holding.symbol.clone(),
                quantity: holding.quantity,
                sector,
            });
        }

        state.sector_chart_base64 = match self.charts.pie_chart(&PieChart {
            title: None,
            slices: breakdown.shares(),
        }) {
            Ok(bytes) => BASE64.encode(bytes),
            Err(e) => {
                warn!("Sector chart failed: {e}");
                String::new()
            }
        };
        state.classified = classified;
        state.sector_breakdown = breakdown;
        Ok(())
    }
}

pub struct DiversificationRecommender {
    llm: Arc<dyn LanguageModel>,
    pause: Duration,
}

#[async_trait]
impl Step<PortfolioWorkflowState> for DiversificationRecommender {
    fn name(&self) -> &'static str {
        "diversification_recommender"
    }

    async fn run(&self, state: &mut PortfolioWorkflowState) -> Result<(), DomainError> {
        state.ai_insights = self
            .llm
            .complete(&prompts::portfolio_insights(&state.classified, &state.sector_breakdown, state.risk))
            .await?;

        // Provider rate limits
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }

        state.recommendations = self
            .llm
            .complete(&prompts::diversification(&state.classified, &state.sector_breakdown, state.risk))
            .await?;
        Ok(())
    }
}

pub struct PortfolioUseCase {
    workflow: Workflow<PortfolioWorkflowState>,
    chart_mime: &'static str,
}

impl PortfolioUseCase {
    pub fn new(llm: Arc<dyn LanguageModel>, charts: Arc<dyn ChartRenderer>, pause: Duration) -> Self {
        let chart_mime = charts.mime();
        let workflow = Workflow::new("portfolio")
            .then(SectorAnalyzer {
                llm: llm.clone(),
                charts,
            })
            .then(DiversificationRecommender { llm, pause });
        Self { workflow, chart_mime }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.workflow.step_names()
    }

    pub async fn execute(&self, holdings: Vec<Holding>, risk: RiskAppetite) -> Result<PortfolioReport, DomainError> {
        if holdings.is_empty() {
            return Err(DomainError::InvalidInput("Portfolio must contain at least one holding".into()));
        }
        let holdings = holdings
            .into_iter()
            .map(|h| Holding::new(h.symbol, h.quantity))
            .collect::<Result<Vec<_>, _>>()?;

        let state = self
            .workflow
            .invoke(PortfolioWorkflowState::new(holdings, risk))
            .await?;

        Ok(PortfolioReport {
            portfolio: state.classified,
            sector_breakdown: state.sector_breakdown,
            sector_chart_base64: state.sector_chart_base64,
            chart_mime: self.chart_mime.to_string(),
            ai_insights: state.ai_insights,
            recommendations: state.recommendations,
        })
    }
}
