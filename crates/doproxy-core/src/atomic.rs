//! Write-then-rename file replacement

use crate::error::{FleetError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace `path` with `contents`
///
/// The data is written and synced to `<path>.tmp` first, then renamed over
/// the original, so readers see either the old or the new file, never a
/// partial one.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    let mut file = fs::File::create(&tmp)
        .await
        .map_err(|e| FleetError::io(&tmp, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| FleetError::io(&tmp, e))?;
    file.sync_all().await.map_err(|e| FleetError::io(&tmp, e))?;
    drop(file);

    fs::rename(&tmp, path)
        .await
        .map_err(|e| FleetError::io(path, e))?;

    tracing::debug!("Replaced {}", path.display());
    Ok(())
}
