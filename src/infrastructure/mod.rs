pub mod chart;
pub mod embeddings;
pub mod llm;
pub mod market;
pub mod news;
pub mod sentiment;
pub mod sqlite;
