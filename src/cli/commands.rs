use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stock-insights", version, about = "Stock insights and portfolio analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "PORT", default_value = "8000")]
        port: u16,
    },
    /// Answer one or more stock questions and print the session history
    Ask {
        /// e.g. "How is Tata Motors doing?"
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Analyze a portfolio
    Portfolio {
        /// Risk appetite (low, moderate, high)
        #[arg(long, default_value = "moderate")]
        risk: String,
        /// Holdings as SYMBOL:QTY
        #[arg(required = true)]
        holdings: Vec<String>,
    },
    /// List the steps of both workflows
    Steps,
}
