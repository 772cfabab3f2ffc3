//! Backend instance model

use doproxy_cloud::{Droplet, DropletId, DropletStatus};
use serde::Serialize;

/// A droplet serving as a load-balancer backend
///
/// Its ordinal is its index in the fleet, which always equals its line
/// number in the inventory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInstance {
    pub id: DropletId,
    pub name: String,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    pub status: DropletStatus,
}

impl From<Droplet> for BackendInstance {
    fn from(d: Droplet) -> Self {
        Self {
            id: d.id,
            name: d.name,
            private_ip: d.private_ip,
            public_ip: d.public_ip,
            status: d.status,
        }
    }
}

impl BackendInstance {
    /// One line of `print` output
    pub fn describe(&self, ordinal: usize) -> String {
        format!(
            "{}) {}  (pvt ip: {}, status: {}, id: {})",
            ordinal,
            self.name,
            self.private_ip.as_deref().unwrap_or("-"),
            self.status,
            self.id
        )
    }
}
