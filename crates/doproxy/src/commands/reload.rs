use crate::utils;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let manager = utils::open_manager(config).await?;
    manager.reload().await?;
    utils::success(&format!(
        "HAProxy config regenerated with {} backends and reloaded.",
        manager.backends().len()
    ));
    Ok(())
}
