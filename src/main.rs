use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use stock_insights::cli::commands::{Cli, Commands};
use stock_insights::config::Config;
use stock_insights::domain::entities::holding::Holding;
use stock_insights::domain::values::risk::RiskAppetite;
use stock_insights::StockInsights;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "stock_insights=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app = match StockInsights::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Error initializing stock insights: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(app, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(app: StockInsights, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { host, port } => {
            stock_insights::api::serve(Arc::new(app), &host, port).await?;
        }
        Commands::Ask { queries } => {
            let failed = app.ask_all(&queries).await.iter().filter(|r| r.is_err()).count();
            println!("{}", serde_json::to_string_pretty(&json!({ "history": app.history() }))?);
            if failed > 0 {
                return Err(format!("{failed} of {} queries failed", queries.len()).into());
            }
        }
        Commands::Portfolio { risk, holdings } => {
            let risk: RiskAppetite = risk.parse()?;
            let holdings = holdings
                .iter()
                .map(|h| h.parse::<Holding>())
                .collect::<Result<Vec<_>, _>>()?;
            let report = app.analyze_portfolio(holdings, risk).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Steps => {
            let steps = json!({
                "stock_query": app.stock_steps(),
                "portfolio": app.portfolio_steps(),
            });
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
    }
    Ok(())
}
