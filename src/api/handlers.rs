use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::domain::entities::holding::Holding;
use crate::domain::entities::report::{PortfolioReport, QueryReport};
use crate::domain::values::risk::RiskAppetite;
use crate::StockInsights;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const DASHBOARD_HTML: &str = include_str!("../../templates/dashboard.html");
const PORTFOLIO_HTML: &str = include_str!("../../templates/portfolio.html");

pub type AppState = Arc<StockInsights>;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub user_query: String,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub portfolio: Vec<Holding>,
    pub risk: RiskAppetite,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn portfolio_page() -> Html<&'static str> {
    Html(PORTFOLIO_HTML)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /query
pub async fn run_query(
    State(app): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryReport>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(app.ask(&req.user_query).await?))
}

/// GET /history
pub async fn get_history(State(app): State<AppState>) -> Json<Value> {
    Json(json!({ "history": app.history() }))
}

/// DELETE /history
pub async fn clear_history(State(app): State<AppState>) -> Json<Value> {
    let cleared = app.clear_history();
    Json(json!({ "message": "Chat history cleared", "cleared": cleared }))
}

/// POST /portfolio-analysis
pub async fn analyze_portfolio(
    State(app): State<AppState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<PortfolioReport>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(app.analyze_portfolio(req.portfolio, req.risk).await?))
}
