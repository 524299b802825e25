use crate::domain::entities::price_bar::PriceBar;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Yahoo Finance daily history using the v8 chart API (no auth required).
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                     AppleWebKit/537.36 (KHTML, like Gecko) \
                     Chrome/120.0.0.0 Safari/537.36",
                )
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartData {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, serde::Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Turns a chart payload into bars. Rows with any missing field are dropped.
/// A Yahoo-side "not found" error is an empty history, not a failure.
fn parse_chart(body: &str) -> Result<Vec<PriceBar>, DomainError> {
    let data: ChartResponse =
        serde_json::from_str(body).map_err(|e| DomainError::Parse(format!("Yahoo chart: {e}")))?;

    if let Some(err) = data.chart.error {
        if err.get("code").and_then(|c| c.as_str()) == Some("Not Found") {
            return Ok(vec![]);
        }
        return Err(DomainError::MarketData(format!("Yahoo error: {err}")));
    }

    let Some(chart) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(vec![]);
    };
    let quote = chart.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = chart
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = DateTime::from_timestamp(ts + chart.meta.gmtoffset, 0)?.date_naive();
            Some(PriceBar::new(
                date,
                (*quote.open.get(i)?)?,
                (*quote.high.get(i)?)?,
                (*quote.low.get(i)?)?,
                (*quote.close.get(i)?)?,
                (*quote.volume.get(i)?)?,
            ))
        })
        .collect();
    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn daily_history(&self, symbol: &str, days: u32) -> Result<Vec<PriceBar>, DomainError> {
        let now = Utc::now();
        let start = now - Duration::days(days as i64);
        let url = format!("{}/v8/finance/chart/{symbol}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::MarketData(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::MarketData(e.to_string()))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            warn!("Yahoo has no chart for {symbol}");
            return Ok(vec![]);
        }
        if !status.is_success() {
            return Err(DomainError::MarketData(format!(
                "Yahoo API returned {status} for {symbol}"
            )));
        }

        let bars = parse_chart(&body)?;
        debug!(symbol, days, bars = bars.len(), "fetched daily history");
        Ok(bars)
    }
}
