use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;

use runner_transport::config::{load_config, TransportConfig};
use runner_transport::http::SystemPlatform;
use runner_transport::observability::logging::init_logging;
use runner_transport::{ConnectionFactory, TransportDefaults};

#[derive(Parser)]
#[command(name = "transport-probe")]
#[command(about = "Print the transport settings a runner would use", long_about = None)]
struct Cli {
    /// Transport configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Explicit send timeout in seconds, as a caller would pass it.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TransportConfig::default(),
    };
    init_logging(cli.log_level.as_deref().unwrap_or(&config.observability.log_level));

    let defaults = TransportDefaults::from_config(
        &config,
        &SystemPlatform,
        &runner_transport::config::ProcessEnv,
    )?;
    let factory = ConnectionFactory::from_config(Arc::new(defaults), &config);

    let timeout = cli.timeout.map(Duration::from_secs);
    let report = json!({
        "client": factory.client_settings(timeout),
        "raw": factory.raw_settings(timeout),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
