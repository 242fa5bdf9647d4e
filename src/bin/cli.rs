//! ATS job search CLI
//!
//! Local execution entry point. For AWS Lambda, use `ats-search-lambda`.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ats_search::{
    error::Result,
    models::{Config, Filters, HealthResponse, SearchResponse},
    pipeline::SearchEngine,
};
use clap::{Parser, Subcommand};

/// ats-search - job postings from Greenhouse, Lever and Ashby boards
#[derive(Parser, Debug)]
#[command(
    name = "ats-search",
    version,
    about = "Search and rank job postings across ATS boards"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search query and print the response JSON
    Search {
        /// JSON query file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        query: PathBuf,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Print the health payload
    Health,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn read_query(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn print_json<T: serde::Serialize>(payload: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    println!("{json}");
    Ok(())
}

async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Search { query, pretty } => {
            let config = Config::load_or_default(&cli.config);
            config.validate()?;

            let result = match read_query(&query).and_then(|raw| Filters::from_json(&raw)) {
                Ok(filters) => {
                    let engine = SearchEngine::from_config(&config)?;
                    engine.search(&filters).await
                }
                Err(e) => Err(e),
            };

            let (status, response) = SearchResponse::from_result(result);
            print_json(&response, pretty)?;
            log::debug!("Search finished with status {}", status);
            Ok(response.is_ok())
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", cli.config.display());
            Ok(true)
        }

        Command::Health => {
            print_json(&HealthResponse::now(), false)?;
            Ok(true)
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
