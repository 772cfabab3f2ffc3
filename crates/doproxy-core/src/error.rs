use doproxy_cloud::{CloudError, DropletId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Specified line does not exist in inventory: {position} (inventory has {len} entries)")]
    Index { position: i64, len: usize },

    #[error("Provider error: {0}")]
    Provider(#[from] CloudError),

    #[error("Could not find master droplet '{0}'")]
    MasterNotFound(String),

    #[error("Image '{0}' was not created")]
    ImageNotMaterialized(String),

    #[error("Droplet {id} was not accepted: status was '{status}' instead of 'new'")]
    UnexpectedStatus { id: DropletId, status: String },

    #[error("Template error: {path}\n{message}")]
    Template { path: PathBuf, message: String },

    #[error("IO error: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Inventory, proxy configuration and provider no longer agree.
    /// Nothing is rolled back; the operator has to reconcile by hand.
    #[error("Inconsistent state: {message}: {source}")]
    Consistency {
        message: String,
        #[source]
        source: Box<FleetError>,
    },
}

impl FleetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FleetError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn inconsistent(message: impl Into<String>, source: FleetError) -> Self {
        FleetError::Consistency {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self, FleetError::Consistency { .. })
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
