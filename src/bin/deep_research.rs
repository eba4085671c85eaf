//! CLI binary for running a deep research session.

use clap::Parser;
use deep_research::config::ResearchConfig;
use deep_research::credentials::CredentialSource;
use deep_research::llm::{build_provider, AiProvider};
use deep_research::research::report::render;
use deep_research::research::{
    save_report, Audience, GatherLimits, OutputFormat, ResearchDepth, ResearchPipeline, ToolBox,
};
use research_search::{AcademicSearch, SearchAggregator, SearchProvider};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Multi-agent deep research over web and academic sources.
#[derive(Parser)]
#[command(name = "deep-research", version, about)]
struct Cli {
    /// Topic to research.
    #[arg(short, long, required_unless_present = "show_providers")]
    topic: Option<String>,

    /// Research depth: basic, comprehensive or expert.
    #[arg(short, long)]
    depth: Option<ResearchDepth>,

    /// Target audience: general, academic, business or technical.
    #[arg(short, long)]
    audience: Option<Audience>,

    /// Report format: markdown, html or json.
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// AI provider: openai, anthropic or google.
    #[arg(short, long)]
    provider: Option<AiProvider>,

    /// Preferred web search provider (google, serper, tavily, brave, duckduckgo).
    #[arg(long)]
    search_provider: Option<SearchProvider>,

    /// Print the report instead of saving it.
    #[arg(long)]
    no_save: bool,

    /// JSON file of API keys, overriding the environment.
    #[arg(long, value_name = "JSON")]
    api_keys: Option<PathBuf>,

    /// List configured AI and search providers, then exit.
    #[arg(long)]
    show_providers: bool,

    /// Path to TOML configuration file.
    #[arg(short, long, env = "DEEP_RESEARCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deep_research=info,research_search=info")),
        )
        .init();

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("research failed: {e:#}");
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down...");
            eprintln!("\nResearch interrupted.");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ResearchConfig::from_file(path)?,
        None => ResearchConfig::default(),
    };
    config.apply_env_overrides(|name| std::env::var(name).ok());
    if let Some(provider) = cli.search_provider {
        config.search.provider = provider.name().to_lowercase();
    }
    config.validate()?;

    let mut credentials = CredentialSource::from_env();
    if let Some(path) = &cli.api_keys {
        credentials = credentials.with_json_file(path)?;
    }

    if cli.show_providers {
        show_providers(&credentials);
        return Ok(());
    }

    let topic = cli
        .topic
        .ok_or_else(|| anyhow::anyhow!("--topic is required"))?;
    let depth = cli.depth.unwrap_or(config.research.depth);
    let audience = cli.audience.unwrap_or(config.research.audience);
    let format = cli.format.unwrap_or(config.research.output_format);

    let keys = credentials.llm_keys();
    if !keys.any() {
        anyhow::bail!(
            "no AI provider API key found; set OPENAI_API_KEY, ANTHROPIC_API_KEY or GOOGLE_API_KEY"
        );
    }
    let wanted = cli.provider.unwrap_or(config.llm.provider);
    let key_for = |p: AiProvider| match p {
        AiProvider::OpenAi => keys.openai.clone(),
        AiProvider::Anthropic => keys.anthropic.clone(),
        AiProvider::Google => keys.google.clone(),
    };
    let (provider, api_key) = std::iter::once(wanted)
        .chain(AiProvider::all())
        .find_map(|p| key_for(p).map(|k| (p, k)))
        .ok_or_else(|| anyhow::anyhow!("no usable AI provider"))?;
    if provider != wanted {
        warn!(%wanted, using = %provider, "preferred AI provider has no API key");
    }
    let model = config.llm.model_for(provider).to_owned();

    let search_config = config
        .search
        .to_search_config(credentials.search_credentials());
    let web = SearchAggregator::for_preference(config.search.preference(), search_config);
    info!(providers = ?web.providers(), "web search plan");
    let tools = ToolBox::new(
        web,
        Arc::new(AcademicSearch::default()),
        GatherLimits::from(&config.research),
    );

    let llm = build_provider(
        provider,
        api_key,
        Some(Duration::from_secs(config.llm.timeout_seconds)),
    );
    let pipeline = ResearchPipeline::new(llm, provider, model, tools)
        .with_sampling(config.llm.max_tokens, config.llm.temperature);

    println!("Deep Research v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Researching \"{topic}\" ({depth}, {audience} audience) with {} {}\n",
        provider.as_str().to_uppercase(),
        pipeline.model()
    );

    let report = pipeline.run(&topic, depth, audience).await?;

    println!("Research completed in {:.2} seconds", report.execution_time);
    println!("Key findings: {}", report.key_findings.len());
    println!("Recommendations: {}", report.recommendations.len());
    println!("Sources: {}", report.sources.len());

    if cli.no_save || !config.research.save_output {
        println!("\n{}", render(&report, format)?);
        return Ok(());
    }
    match save_report(&report, format, &config.research.output_dir) {
        Ok(path) => {
            println!("Report saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "could not save report, printing it instead");
            println!("\n{}", render(&report, format)?);
            Err(e.into())
        }
    }
}

fn show_providers(credentials: &CredentialSource) {
    let keys = credentials.llm_keys();
    println!("AI providers:");
    for (provider, key) in [
        (AiProvider::OpenAi, &keys.openai),
        (AiProvider::Anthropic, &keys.anthropic),
        (AiProvider::Google, &keys.google),
    ] {
        let status = if key.is_some() { "available" } else { "not configured" };
        println!("  - {:<10} {status} ({})", provider.as_str(), provider.key_var());
    }

    let search = credentials.search_credentials();
    println!("\nSearch providers:");
    for provider in SearchProvider::all() {
        let status = if search.has_credentials(*provider) {
            "available"
        } else {
            "not configured"
        };
        println!("  - {:<10} {status}", provider.name());
    }
}
