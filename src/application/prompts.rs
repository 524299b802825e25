//! Prompt templates for every LLM call the pipelines make.

use crate::domain::entities::holding::ClassifiedHolding;
use crate::domain::entities::news_article::SimilarArticle;
use crate::domain::entities::price_bar::PriceBar;
use crate::domain::values::risk::RiskAppetite;
use crate::domain::values::sector_breakdown::SectorBreakdown;

pub fn extract_symbol(query: &str) -> String {
    format!(
        "You are a financial assistant. Extract ONLY the stock name or company name from this query.\n\
         Rules:\n\
         - Return ONLY the name like \"Tata Motors\" or \"AAPL\".\n\
         - No explanation, punctuation, or extra text.\n\
         - If no stock/company is mentioned, return \"None\".\n\
         \n\
         Query: {query}"
    )
}

pub fn news_summary(articles: &[SimilarArticle]) -> String {
    let article_text = articles
        .iter()
        .map(|a| format!("Title: {}\nContent: {}", a.title, a.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Summarize the following news articles in 5 concise bullet points:\n\
         {article_text}\n\
         Reply with the summary only, as 5-6 bullet points, without any preamble."
    )
}

pub fn stock_insights(stock_data: &[PriceBar], news_summary: &str) -> String {
    let data = serde_json::to_string(stock_data).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Here is the 7-day stock data and news summary.\n\
         Please generate a short response summarizing the stock's outlook and suggest an action \
         (buy, hold, sell) based on the data and news.\n\
         \n\
         Stock Data: {data}\n\
         News Summary: {news_summary}"
    )
}

pub fn sector_for(symbol: &str) -> String {
    format!(
        "Identify the SECTOR ONLY STRICTLY for this Indian stock symbol: {symbol}.\n\
         Only return the sector name (e.g., IT, Energy, Banking, FMCG, Pharma, Metals, Auto, Telecom).\n\
         If unknown, guess based on the company name."
    )
}

fn describe_portfolio(portfolio: &[ClassifiedHolding]) -> String {
    portfolio
        .iter()
        .map(|h| format!("{} x{} ({})", h.symbol, h.quantity, h.sector))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn portfolio_insights(portfolio: &[ClassifiedHolding], sectors: &SectorBreakdown, risk: RiskAppetite) -> String {
    format!(
        "The user's portfolio is: {}.\n\
         Sector allocation: {}.\n\
         Risk appetite: {risk}.\n\
         \n\
         Provide in concise bullet points:\n\
         1. 2-3 positive insights about current holdings.\n\
         2. 2-3 future sectors to consider (EV, Renewable Energy, AI, PSUs).\n\
         Keep it under 180 words.",
        describe_portfolio(portfolio),
        sectors.describe(),
    )
}

pub fn diversification(portfolio: &[ClassifiedHolding], sectors: &SectorBreakdown, risk: RiskAppetite) -> String {
    format!(
        "The user's portfolio is: {}.\n\
         Sector allocation: {}.\n\
         Risk appetite: {risk}.\n\
         \n\
         Provide diversification recommendations:\n\
         - Top 3 mutual funds with approximate 1-year returns.\n\
         - Bonds (SGB, Gilt funds) with approximate 1-year returns.\n\
         - REITs and fixed-income options.\n\
         Keep it short, roughly 200-250 words, always give an approximate 1-year return \
         from your knowledge, and do NOT include any links.",
        describe_portfolio(portfolio),
        sectors.describe(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_summary_joins_articles() {
        let articles = vec![
            SimilarArticle {
                url: "u1".into(),
                title: "A".into(),
                content: "first".into(),
                distance: 0.1,
            },
            SimilarArticle {
                url: "u2".into(),
                title: "B".into(),
                content: "second".into(),
                distance: 0.2,
            },
        ];
        let p = news_summary(&articles);
        assert!(p.contains("Title: A\nContent: first\n\nTitle: B\nContent: second"));
    }

    #[test]
    fn test_portfolio_prompts_mention_risk_and_sectors() {
        let holdings = vec![ClassifiedHolding {
            symbol: "TCS".into(),
            quantity: 10,
            sector: "IT".into(),
        }];
        let mut sectors = SectorBreakdown::new();
        sectors.add("IT", 10);

        let p = portfolio_insights(&holdings, &sectors, RiskAppetite::High);
        assert!(p.contains("Risk appetite: High"));
        assert!(p.contains(r#"{"IT": 10}"#));
        assert!(p.contains("TCS x10 (IT)"));

        let d = diversification(&holdings, &sectors, RiskAppetite::Low);
        assert!(d.contains("Risk appetite: Low"));
        assert!(d.contains("do NOT include any links"));
    }

    #[test]
    fn test_extract_prompt_embeds_query() {
        assert!(extract_symbol("How is Infosys doing?").ends_with("Query: How is Infosys doing?"));
    }
}
