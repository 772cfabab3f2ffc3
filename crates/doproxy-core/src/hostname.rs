//! Hostname allocation for new backends
//!
//! Names are `<prefix>-<n>`. `n` comes from a counter persisted next to the
//! inventory and only ever grows, and any `n` whose name is still held by a
//! live backend is skipped.

use crate::atomic::write_atomic;
use crate::error::{FleetError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct HostnameAllocator {
    prefix: String,
    counter_path: PathBuf,
}

impl HostnameAllocator {
    pub fn new(prefix: impl Into<String>, counter_path: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            counter_path: counter_path.into(),
        }
    }

    pub fn counter_path(&self) -> &Path {
        &self.counter_path
    }

    /// Reserve the next hostname not used by any of `live_names`
    ///
    /// Without a counter file the sequence starts at `live_names.len()`.
    pub async fn next(&self, live_names: &[&str]) -> Result<String> {
        let mut n = self.read_counter().await?.unwrap_or(live_names.len() as u64);

        let hostname = loop {
            let candidate = format!("{}-{}", self.prefix, n);
            if !live_names.contains(&candidate.as_str()) {
                break candidate;
            }
            tracing::debug!("Hostname {} is taken, skipping", candidate);
            n += 1;
        };

        write_atomic(&self.counter_path, format!("{}\n", n + 1).as_bytes()).await?;
        tracing::debug!("Allocated hostname {}", hostname);
        Ok(hostname)
    }

    async fn read_counter(&self) -> Result<Option<u64>> {
        match fs::read_to_string(&self.counter_path).await {
            Ok(content) => content.trim().parse::<u64>().map(Some).map_err(|_| {
                FleetError::Configuration(format!(
                    "Hostname counter {} is corrupt: {:?}",
                    self.counter_path.display(),
                    content.trim()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FleetError::io(&self.counter_path, e)),
        }
    }
}
