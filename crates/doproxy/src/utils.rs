use colored::Colorize;
use doproxy_cloud_digitalocean::{DigitalOceanClient, DigitalOceanProvider};
use doproxy_core::{CommandReloader, FleetManager};
use std::path::Path;
use std::sync::Arc;

/// Load the configuration and resolve the inventory against DigitalOcean
pub async fn open_manager(explicit: Option<&Path>) -> anyhow::Result<FleetManager> {
    let config_path = doproxy_config::find_config_file(explicit)?;
    tracing::debug!("Using configuration {}", config_path.display());
    let config = doproxy_config::load_from_path(&config_path)?;

    let client = match &config.api_url {
        Some(url) => DigitalOceanClient::with_base_url(&config.token, url),
        None => DigitalOceanClient::new(&config.token),
    };
    let provider = Arc::new(DigitalOceanProvider::with_client(client));
    let reloader = Arc::new(CommandReloader::new(config.reload_command.clone()));

    Ok(FleetManager::open(Arc::new(config), provider, reloader).await?)
}

/// Print a success line
pub fn success(message: &str) {
    println!("{}", format!("Success: {}", message).green().bold());
}
