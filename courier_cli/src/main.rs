use clap::{Parser, Subcommand};
use courier_client::config::ClientConfig;
use mimalloc::MiMalloc;
use tracing::debug;

use crate::{listings::CustomersArgs, optimize::OptimizeArgs};

mod listings;
mod optimize;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,

    /// Base URL of the delivery backend, overrides COURIER_API_URL
    #[arg(long)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List customers, optionally narrowed by a search text
    Customers {
        #[command(flatten)]
        args: CustomersArgs,
    },
    /// List storages; the default depot is marked
    Storages,
    /// Submit customers for route optimization and render the first route
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    debug!("Delivery backend at {}", config.api_url);

    match cli.command {
        Commands::Customers { args } => listings::run_customers(&config, args).await?,
        Commands::Storages => listings::run_storages(&config).await?,
        Commands::Optimize { args } => optimize::run(&config, args).await?,
    }

    Ok(())
}
