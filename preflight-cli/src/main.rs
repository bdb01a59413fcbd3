//! `preflight` - fill in preflight forms from the terminal.
//!
//! Configuration comes from the environment (a `.env` file is honoured):
//!
//! - `PREFLIGHT_API_URL`: API base URL (default: "http://localhost:8000")
//! - `PREFLIGHT_API_TOKEN`: bearer token sent with every request
//! - `PREFLIGHT_API_TIMEOUT_SECS`: per-request timeout (default: none)
//! - `RUST_LOG`: log filter (default: "preflight=info")
//!
//! Command-line flags take precedence over the environment.

mod cli;
mod coach;
mod report;
mod survey;

use clap::Parser;
use preflight_client::ApiClient;
use preflight_dialoguer_wizard::DialoguerBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("preflight=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.client_config()?;
    tracing::debug!(base_url = %config.base_url, "resolved API configuration");
    let api = ApiClient::new(config)?;

    let backend = if cli.plain {
        DialoguerBackend::plain()
    } else {
        DialoguerBackend::new()
    };

    match cli.command {
        Commands::Survey(args) => survey::run(&api, &backend, args).await,
        Commands::Coach { run_id, pipeline } => coach::run(&api, run_id, pipeline.as_deref()).await,
        Commands::Render(args) => report::render(&api, args).await,
        Commands::Status { run_id } => report::status(&api, run_id).await,
    }
}
