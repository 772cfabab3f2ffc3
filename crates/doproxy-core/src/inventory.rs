//! Inventory file
//!
//! One droplet ID per line. The line number of an ID is the ordinal used to
//! address that backend. Appends go to the end of the file; removal rewrites
//! the whole file through `write_atomic`.

use crate::atomic::write_atomic;
use crate::error::{FleetError, Result};
use doproxy_cloud::DropletId;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Durable, ordered list of backend droplet IDs
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every ID in file order
    ///
    /// The file must already exist; it is never created implicitly.
    pub async fn load(&self) -> Result<Vec<DropletId>> {
        if !fs::try_exists(&self.path)
            .await
            .map_err(|e| FleetError::io(&self.path, e))?
        {
            return Err(FleetError::Configuration(format!(
                "Inventory file {} doesn't exist! Create one.",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| FleetError::io(&self.path, e))?;

        parse(&content, &self.path)
    }

    /// Add `id` as the new last line
    pub async fn append(&self, id: DropletId) -> Result<()> {
        let existing = fs::read_to_string(&self.path)
            .await
            .map_err(|e| FleetError::io(&self.path, e))?;

        let mut line = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            line.push('\n');
        }
        line.push_str(&format!("{}\n", id));

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| FleetError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| FleetError::io(&self.path, e))?;
        file.sync_all()
            .await
            .map_err(|e| FleetError::io(&self.path, e))?;

        tracing::info!("Appended droplet {} to {}", id, self.path.display());
        Ok(())
    }

    /// Remove the line at `position` and return its ID
    ///
    /// Out-of-range positions leave the file untouched.
    pub async fn remove_at(&self, position: i64) -> Result<DropletId> {
        let mut ids = self.load().await?;
        let index = checked_index(position, ids.len())?;
        let removed = ids.remove(index);

        write_atomic(&self.path, render(&ids).as_bytes()).await?;

        tracing::info!(
            "Removed droplet {} (line {}) from {}",
            removed,
            index,
            self.path.display()
        );
        Ok(removed)
    }
}

/// Validate an ordinal against a collection length
pub(crate) fn checked_index(position: i64, len: usize) -> Result<usize> {
    match usize::try_from(position) {
        Ok(index) if index < len => Ok(index),
        _ => Err(FleetError::Index { position, len }),
    }
}

fn parse(content: &str, path: &Path) -> Result<Vec<DropletId>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<DropletId>().map_err(|_| {
                FleetError::Configuration(format!(
                    "Inventory file {} contains an invalid droplet id ({})",
                    path.display(),
                    line
                ))
            })
        })
        .collect()
}

fn render(ids: &[DropletId]) -> String {
    ids.iter().map(|id| format!("{}\n", id)).collect()
}
