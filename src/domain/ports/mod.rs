pub mod chart_port;
pub mod embedding_port;
pub mod llm_port;
pub mod market_data;
pub mod news_source;
pub mod sentiment_port;
pub mod vector_store;
