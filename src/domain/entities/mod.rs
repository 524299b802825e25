pub mod holding;
pub mod news_article;
pub mod price_bar;
pub mod report;
