mod common;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stock_insights::domain::entities::holding::Holding;
use stock_insights::domain::error::DomainError;
use stock_insights::domain::values::risk::RiskAppetite;

fn portfolio_harness(pause: Duration) -> Harness {
    let mut opts = options();
    opts.llm_pause = pause;
    build(
        ScriptedLlm::new(None)
            .with_sector("TCS", "IT")
            .with_sector("INFY", "\"IT.\"")
            .with_sector("RELIANCE", "Energy"),
        FakeMarket::new(),
        FakeNews::new(vec![]),
        Arc::new(KeywordSentiment),
        opts,
    )
}

fn holdings(items: &[(&str, i64)]) -> Vec<Holding> {
    items
        .iter()
        .map(|(s, q)| Holding {
            symbol: s.to_string(),
            quantity: *q,
        })
        .collect()
}

#[tokio::test]
async fn test_sector_breakdown_and_advice() {
    let h = portfolio_harness(Duration::ZERO);
    let report = h
        .app
        .analyze_portfolio(holdings(&[("TCS", 10), ("RELIANCE", 5), ("INFY", 15)]), RiskAppetite::Moderate)
        .await
        .unwrap();

    let sectors: Vec<&str> = report.portfolio.iter().map(|c| c.sector.as_str()).collect();
    assert_eq!(sectors, vec!["IT", "Energy", "IT"]);
    assert_eq!(report.sector_breakdown.get("IT"), Some(25));
    assert_eq!(report.sector_breakdown.get("Energy"), Some(5));
    assert_eq!(report.ai_insights, PORTFOLIO_INSIGHTS);
    assert_eq!(report.recommendations, RECOMMENDATIONS);

    let svg = String::from_utf8(BASE64.decode(&report.sector_chart_base64).unwrap()).unwrap();
    assert!(svg.contains("83.3%"));
    assert!(svg.contains("16.7%"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sector_breakdown"], serde_json::json!({"IT": 25, "Energy": 5}));
    assert_eq!(json["chart_mime"], "image/svg+xml");
}

#[tokio::test]
async fn test_advice_prompts_carry_risk_and_allocation() {
    let h = portfolio_harness(Duration::ZERO);
    h.app
        .analyze_portfolio(holdings(&[("TCS", 10)]), RiskAppetite::High)
        .await
        .unwrap();

    let prompts = h.llm.prompts();
    assert_eq!(h.llm.count_containing("Identify the SECTOR"), 1);
    let advice: Vec<&String> = prompts.iter().filter(|p| p.contains("Risk appetite: High")).collect();
    assert_eq!(advice.len(), 2);
    assert!(advice.iter().all(|p| p.contains(r#"{"IT": 10}"#)));
}

#[tokio::test]
async fn test_unknown_sector_when_reply_empty() {
    let h = portfolio_harness(Duration::ZERO);
    let report = h
        .app
        .analyze_portfolio(holdings(&[("ZZZ", 3)]), RiskAppetite::Low)
        .await
        .unwrap();
    assert_eq!(report.portfolio[0].sector, "Unknown");
}

#[tokio::test]
async fn test_invalid_portfolios_rejected() {
    let h = portfolio_harness(Duration::ZERO);

    let err = h.app.analyze_portfolio(vec![], RiskAppetite::Low).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let err = h
        .app
        .analyze_portfolio(holdings(&[("TCS", 0)]), RiskAppetite::Low)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let err = h
        .app
        .analyze_portfolio(holdings(&[("  ", 4)]), RiskAppetite::Low)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert!(h.llm.prompts().is_empty());
}

#[tokio::test]
async fn test_pause_between_advice_calls() {
    let h = portfolio_harness(Duration::from_millis(150));
    let started = Instant::now();
    h.app
        .analyze_portfolio(holdings(&[("TCS", 1)]), RiskAppetite::Moderate)
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[test]
fn test_portfolio_workflow_order() {
    let h = portfolio_harness(Duration::ZERO);
    assert_eq!(h.app.portfolio_steps(), vec!["sector_analyzer", "diversification_recommender"]);
}
