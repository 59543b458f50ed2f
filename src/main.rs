pub mod types;
pub mod config;
pub mod error;
pub mod data;
pub mod processing;
pub mod palette;
pub mod overlay;
pub mod view;
pub mod context;
pub mod server;

#[cfg(test)]
mod test_support;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "LEP_CHOROPLETH_CONFIG";
const DEFAULT_CONFIG: &str = "config.toml";

/// Serve the interactive Limited English Proficiency choropleth
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides server.port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    info!("Serving map with config: {:?}", config_path);
    let app_config = config::AppConfig::load_from_file(&config_path)?;

    // Fail before touching the data if the map can't be shown anyway
    let token = app_config.access_token()?;

    let dataset = context::Dataset::load(&app_config)?;
    let choropleth = context::ChoroplethContext::new(&app_config, dataset, token)?;

    let port = cli.port.unwrap_or(app_config.server.port);
    server::start_server(choropleth, port, &app_config.server.static_dir).await?;

    Ok(())
}
