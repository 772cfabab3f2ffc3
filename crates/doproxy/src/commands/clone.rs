use crate::utils;
use colored::Colorize;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let mut manager = utils::open_manager(config).await?;
    let master = manager
        .config()
        .droplet_options
        .master
        .clone()
        .unwrap_or_default();
    println!(
        "{}",
        format!("Cloning master droplet '{}'...", master).blue()
    );

    let backend = manager.clone().await?;

    utils::success(&format!(
        "{} ({}) created and added to backend.",
        backend.id,
        backend.name.cyan()
    ));
    Ok(())
}
