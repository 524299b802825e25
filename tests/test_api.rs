mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::*;
use serde_json::{json, Value};
use std::sync::Arc;
use stock_insights::api::build_router;
use tower::util::ServiceExt;

fn router(h: Harness) -> Router {
    build_router(Arc::new(h.app))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = router(setup());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_pages_are_html() {
    let app = router(setup());
    for uri in ["/", "/dashboard", "/portfolio"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"), "{uri}: {content_type}");
    }
}

#[tokio::test]
async fn test_query_then_history_then_clear() {
    let app = router(setup());

    let (status, body) = send(&app, post_json("/query", json!({"user_query": "How is Tata Motors?"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock_symbol"], "tata motors");
    assert_eq!(body["insights"], OUTLOOK);
    assert_eq!(body["stock_data"].as_array().unwrap().len(), 7);
    assert!(body["stock_data"][0]["Close"].is_number());

    let (_, history) = send(&app, get("/history")).await;
    assert_eq!(history["history"].as_array().unwrap().len(), 1);

    let delete = Request::builder().method("DELETE").uri("/history").body(Body::empty()).unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Chat history cleared");
    assert_eq!(body["cleared"], 1);

    let (_, history) = send(&app, get("/history")).await;
    assert!(history["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_without_symbol_is_bad_request() {
    let h = build(
        ScriptedLlm::new(Some("none")),
        FakeMarket::new(),
        FakeNews::new(vec![]),
        Arc::new(KeywordSentiment),
        options(),
    );
    let app = router(h);
    let (status, body) = send(&app, post_json("/query", json!({"user_query": "hello"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("hello"));
}

#[tokio::test]
async fn test_query_unknown_ticker_is_not_found() {
    let h = build(
        ScriptedLlm::new(Some("Nowhere Inc")),
        FakeMarket::new(),
        FakeNews::new(vec![]),
        Arc::new(KeywordSentiment),
        options(),
    );
    let app = router(h);
    let (status, body) = send(&app, post_json("/query", json!({"user_query": "Nowhere Inc?"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("NOWHEREINC.NS"));
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let h = build(
        ScriptedLlm::new(Some("Tata Motors")),
        FakeMarket::new().with_series("TATAMOTORS.NS", 60),
        FakeNews::new(tata_articles()),
        Arc::new(FailingSentiment),
        options(),
    );
    let app = router(h);
    let (status, body) = send(&app, post_json("/query", json!({"user_query": "Tata Motors"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("model loading"));
}

#[tokio::test]
async fn test_portfolio_analysis() {
    let h = build(
        ScriptedLlm::new(None).with_sector("TCS", "IT").with_sector("ONGC", "Energy"),
        FakeMarket::new(),
        FakeNews::new(vec![]),
        Arc::new(KeywordSentiment),
        options(),
    );
    let app = router(h);
    let payload = json!({
        "portfolio": [{"symbol": "TCS", "quantity": 10}, {"symbol": "ONGC", "quantity": 30}],
        "risk": "high"
    });
    let (status, body) = send(&app, post_json("/portfolio-analysis", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector_breakdown"], json!({"IT": 10, "Energy": 30}));
    assert_eq!(body["portfolio"][1]["sector"], "Energy");
    assert_eq!(body["recommendations"], RECOMMENDATIONS);
    assert!(!body["sector_chart_base64"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_portfolio_with_bad_quantity_is_bad_request() {
    let app = router(setup());
    let payload = json!({"portfolio": [{"symbol": "TCS", "quantity": -1}], "risk": "Low"});
    let (status, body) = send(&app, post_json("/portfolio-analysis", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("TCS"));
}

#[tokio::test]
async fn test_portfolio_with_unknown_risk_is_json_bad_request() {
    let app = router(setup());
    let payload = json!({"portfolio": [{"symbol": "TCS", "quantity": 5}], "risk": "Medium-High"});
    let response = app.clone().oneshot(post_json("/portfolio-analysis", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Medium-High"));
}

#[tokio::test]
async fn test_query_with_malformed_body_is_json_bad_request() {
    let app = router(setup());

    let (status, body) = send(&app, post_json("/query", json!({"question": "Tata Motors"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("user_query"));

    let request = Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}
