use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use litscout::config::{find_config_file, get_config, load_config, EngineConfig};
use litscout::engine::SearchEngine;
use litscout::models::{Backend, SearchFilters, SearchOptions};
use litscout::utils::{render_classification, render_outcome, OutputStyle};

/// litscout - search aggregation and quality filtering for academic writing
#[derive(Parser, Debug)]
#[command(name = "litscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query search backends with credibility filtering", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Table if stdout is a terminal, JSON otherwise
    Auto,
    Table,
    Json,
}

impl From<OutputFormat> for OutputStyle {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Auto => OutputStyle::Auto,
            OutputFormat::Table => OutputStyle::Table,
            OutputFormat::Json => OutputStyle::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a search through the engine
    Search {
        /// Query string
        query: String,

        /// Backend to use (bypasses the provider pairing)
        #[arg(long, short)]
        backend: Option<String>,

        /// Active text-generation provider (resolved via the pairing table)
        #[arg(long, short)]
        provider: Option<String>,

        /// Maximum number of results
        #[arg(long, short = 'n', default_value_t = 8)]
        max_results: usize,

        /// Only academic sources
        #[arg(long)]
        academic_only: bool,

        /// Only peer-reviewed material
        #[arg(long)]
        peer_reviewed: bool,

        /// Minimum citation count
        #[arg(long)]
        min_citations: Option<u32>,

        /// Preferred result language (ISO code)
        #[arg(long)]
        language: Option<String>,
    },

    /// Classify a URL into a credibility tier
    Classify {
        /// URL to classify
        url: String,
    },

    /// List registered backends with quotas and capabilities
    Backends,
}

fn init_logging(verbosity: u8) {
    let directive = match verbosity {
        0 => "litscout=warn",
        1 => "litscout=info",
        2 => "litscout=debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    match path.or_else(find_config_file) {
        Some(path) => Ok(load_config(&path)?),
        None => Ok(get_config()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(cli.config)?;
    let style: OutputStyle = cli.output.into();

    match cli.command {
        Commands::Search {
            query,
            backend,
            provider,
            max_results,
            academic_only,
            peer_reviewed,
            min_citations,
            language,
        } => {
            let engine = SearchEngine::new(config);

            let mut filters = SearchFilters::new()
                .academic_only(academic_only)
                .peer_reviewed_only(peer_reviewed);
            if let Some(min) = min_citations {
                filters = filters.minimum_citations(min);
            }

            let mut options = SearchOptions::new()
                .max_results(max_results)
                .filters(filters);
            if let Some(id) = backend.as_deref() {
                let parsed = Backend::parse(id)
                    .ok_or_else(|| anyhow::anyhow!("unknown backend '{id}'"))?;
                options = options.backend(parsed);
            }
            if let Some(provider) = provider {
                options = options.text_provider(provider);
            }
            if let Some(language) = language {
                options = options.language(language);
            }

            let outcome = engine.search(&query, options).await;
            println!("{}", render_outcome(&outcome, style));
        }

        Commands::Classify { url } => {
            let engine = SearchEngine::with_registry(
                config,
                litscout::backends::BackendRegistry::empty(),
            );
            let quality = engine.classifier().classify(&url);
            println!("{}", render_classification(&url, &quality, style));
        }

        Commands::Backends => {
            let engine = SearchEngine::new(config);
            for backend in Backend::ALL {
                let Some(adapter) = engine.registry().get(backend) else {
                    println!("{:<12} (not registered)", backend.id());
                    continue;
                };
                let limiter = engine.dispatcher().limiter();
                let simulated = if adapter.is_simulated() { " [simulated]" } else { "" };
                println!(
                    "{:<12} {:<18} quota {}/min{}",
                    backend.id(),
                    adapter.name(),
                    limiter.quota(backend),
                    simulated
                );
            }
        }
    }

    Ok(())
}
