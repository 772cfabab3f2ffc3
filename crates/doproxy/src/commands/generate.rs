use crate::utils;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let manager = utils::open_manager(config).await?;
    manager.generate().await?;
    utils::success(&format!(
        "{} generated with {} backends.",
        manager.config().haproxy_cfg_file.display(),
        manager.backends().len()
    ));
    Ok(())
}
