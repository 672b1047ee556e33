//! prismata-crawler - Prismata wiki unit crawler CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use prismata_crawler::commands::{FetchCommand, Include};
use prismata_crawler::config::Config;
use prismata_crawler::export;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prismata-crawler",
    version,
    about = "Prismata wiki unit crawler",
    long_about = "Fetches the unit listing and per-unit detail pages from a \
                  gamepedia-style wiki and exports the combined data as JSON or CSV."
)]
struct Cli {
    /// Wiki root URL, or a local directory of saved pages
    #[arg(long, global = true, env = "PRISMATA_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PRISMATA_PROXY")]
    proxy: Option<String>,

    /// Lower bound of the inter-request delay in seconds
    #[arg(long, global = true, env = "PRISMATA_DELAY_MIN")]
    delay_min: Option<f64>,

    /// Upper bound of the inter-request delay in seconds
    #[arg(long, global = true, env = "PRISMATA_DELAY_MAX")]
    delay_max: Option<f64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch unit data from the wiki
    #[command(alias = "f")]
    Fetch {
        /// Unit names to fetch; empty or "all" fetches everything
        units: Vec<String>,

        /// Write the combined model as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the flattened model as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Save fetched HTML under the configured save path
        #[arg(long)]
        save_source: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(min) = cli.delay_min {
        config.delay_min_secs = min;
    }
    if let Some(max) = cli.delay_max {
        config.delay_max_secs = max;
    }

    match cli.command {
        Commands::Fetch { units, json, csv, save_source } => {
            config.save_source = config.save_source || save_source;

            let include = Include::from_names(&units);
            let cmd = FetchCommand::new(config);
            let data = cmd.execute(&include).await?;

            if json.is_none() && csv.is_none() {
                println!("{}", export::to_json_string(&data)?);
                return Ok(());
            }

            if let Some(path) = json {
                export::write_json(&data, &path)?;
            }
            if let Some(path) = csv {
                export::write_csv(&data, &path)?;
            }
        }
    }

    Ok(())
}
