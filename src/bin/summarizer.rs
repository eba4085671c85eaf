//! Summarization HTTP service.
//!
//! Requires `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` and `GOOGLE_API_KEY` at
//! startup and exits with status 1 if any is missing.

use clap::Parser;
use deep_research::config::ResearchConfig;
use deep_research::credentials::CredentialSource;
use deep_research::entities::EntityExtractor;
use deep_research::prompt::PromptBuilder;
use deep_research::summarizer::{SummarizationService, SummarizerProviders, SummarizerServer};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Summarize web search results with hosted LLMs over HTTP.
#[derive(Parser)]
#[command(name = "research-summarizer", version, about)]
struct Cli {
    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 picks a free port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to TOML configuration file.
    #[arg(short, long, env = "DEEP_RESEARCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deep_research=info,research_search=info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("summarizer failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ResearchConfig::from_file(path)?,
        None => ResearchConfig::default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let keys = CredentialSource::from_env().llm_keys().require_all()?;
    let providers = SummarizerProviders::from_keys(
        keys,
        Some(Duration::from_secs(config.llm.timeout_seconds)),
    );
    let service = SummarizationService::new(providers, PromptBuilder::new(EntityExtractor::heuristic()?));

    let server = SummarizerServer::start(Arc::new(service), &config.server).await?;
    info!(addr = %server.addr(), "summarizer ready, press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl+C, shutting down...");
    server.shutdown();
    Ok(())
}
