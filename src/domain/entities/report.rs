use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::holding::ClassifiedHolding;
use crate::domain::entities::price_bar::PriceBar;
use crate::domain::values::sector_breakdown::SectorBreakdown;
use crate::domain::values::sentiment::SentimentResult;

/// Answer to a single stock query. Also the unit stored in chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub id: String,
    pub asked_at: DateTime<Utc>,
    pub query: String,
    pub stock_symbol: String,
    pub stock_data: Vec<PriceBar>,
    /// Base64-encoded chart, empty when no chart could be produced.
    pub chart_base64: String,
    pub chart_mime: String,
    pub news_summary: String,
    pub insights: String,
    pub sentiment_results: Vec<SentimentResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub portfolio: Vec<ClassifiedHolding>,
    pub sector_breakdown: SectorBreakdown,
    pub sector_chart_base64: String,
    pub chart_mime: String,
    pub ai_insights: String,
    pub recommendations: String,
}
