use crate::utils;
use colored::Colorize;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let mut manager = utils::open_manager(config).await?;
    println!("{}", "Creating droplet...".blue());

    let backend = manager.create().await?;

    utils::success(&format!(
        "{} ({}) created and added to backend.",
        backend.id,
        backend.name.cyan()
    ));
    Ok(())
}
