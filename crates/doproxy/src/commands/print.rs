use crate::utils;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let manager = utils::open_manager(config).await?;
    print!("{}", manager.print_inventory());
    Ok(())
}
