use std::path::PathBuf;

use airwise::AirwiseConfig;
use airwise::config::LoggingConfig;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Multi-source air quality service with an outdoor spot finder
#[derive(Debug, Parser)]
#[command(name = "airwise", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides `server.port`
    #[arg(long)]
    port: Option<u16>,
}

fn init_logging(logging: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AirwiseConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging);
    tracing::info!("Starting airwise {}", airwise::VERSION);

    airwise::web::run(&config).await
}
