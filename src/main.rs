//! sellup-tracker - SellUp buyback price tracker CLI
//!
//! Pulls dealer buyback quotes from SellUp and syncs them to Google Sheets.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sellup_tracker::commands::{QuoteCommand, RunCommand};
use sellup_tracker::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sellup-tracker",
    version,
    about = "SellUp buyback price tracker",
    long_about = "Fetches dealer buyback quotes from the SellUp pricing endpoint and \
                  performs a clear-and-rewrite sync into a Google Sheets tab."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the products JSON file
    #[arg(short, long, global = true, env = "SELLUP_PRODUCTS")]
    products: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SELLUP_PROXY")]
    proxy: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all catalog products and sync the spreadsheet
    #[command(alias = "r")]
    Run {
        /// Print collected rows instead of writing the sheet
        #[arg(long)]
        dry_run: bool,

        /// Process at most N products
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch and print quotes for selected products
    #[command(alias = "q")]
    Quote {
        /// goods_id(s) to quote
        #[arg(required = true)]
        goods_ids: Vec<String>,
    },

    /// List the product catalog
    Products,
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
    config.format = cli.format;

    if let Some(products) = cli.products {
        config.products_file = products;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Run { dry_run, limit } => {
            if limit.is_some() {
                config.limit = limit;
            }

            let cmd = RunCommand::new(config, dry_run);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Quote { goods_ids } => {
            let cmd = QuoteCommand::new(config);
            let output = cmd.execute(&goods_ids).await?;
            println!("{}", output);
        }

        Commands::Products => {
            let catalog = sellup_tracker::catalog::Catalog::load(&config.products_file)?;

            match config.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(catalog.products())?);
                }
                _ => {
                    println!("{:<10} {}", "Goods", "Product");
                    println!("{:-<10} {:-<40}", "", "");
                    for product in catalog.products() {
                        println!("{:<10} {}", product.goods_id, product.product_name);
                    }
                    println!("\nTotal: {} products", catalog.len());
                }
            }
        }
    }

    Ok(())
}
