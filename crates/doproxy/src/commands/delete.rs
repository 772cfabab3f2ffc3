use crate::utils;
use colored::Colorize;
use std::path::Path;

pub async fn handle(config: Option<&Path>, ordinal: Option<i64>) -> anyhow::Result<()> {
    // Checked before any configuration is loaded
    let Some(ordinal) = ordinal else {
        println!("{}", "Specify which droplet to delete!".yellow());
        return Ok(());
    };

    let mut manager = utils::open_manager(config).await?;
    println!("{}", format!("Deleting droplet at line {}...", ordinal).yellow());

    let backend = manager.delete(ordinal).await?;

    utils::success(&format!(
        "{} ({}) deleted and removed from backend.",
        backend.id,
        backend.name.cyan()
    ));
    Ok(())
}
