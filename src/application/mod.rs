pub mod history;
pub mod portfolio;
pub mod prompts;
pub mod stock_query;
pub mod workflow;
