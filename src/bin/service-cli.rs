use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_client::config::load_config;
use service_client::{ClientConfig, ServiceClient};

#[derive(Parser)]
#[command(name = "service-cli")]
#[command(about = "Connectivity diagnostics for the sample-tracking services", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults to the built-in service catalog.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot connectivity probe of every configured service
    Check,
    /// Run the health monitor and print a status summary per interval
    Watch {
        /// Number of summaries to print before exiting
        #[arg(short, long, default_value_t = 3)]
        rounds: u32,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "service_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    let interval = Duration::from_millis(config.health_check.interval_ms);

    match cli.command {
        Commands::Check => {
            let client = ServiceClient::new(config);
            let map = client.test_connectivity().await;
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Commands::Watch { rounds } => {
            let client = ServiceClient::new(config);
            client.start_health_monitor();
            for _ in 0..rounds {
                tokio::time::sleep(interval).await;
                let summary = client.status_summary();
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            client.stop_health_monitor();
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
