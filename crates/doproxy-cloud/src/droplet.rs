//! Droplet and image types

use serde::{Deserialize, Serialize};

pub type DropletId = u64;

/// A provisioned virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    /// Provider-assigned droplet ID
    pub id: DropletId,

    /// Hostname given at creation
    pub name: String,

    /// Lifecycle status
    pub status: DropletStatus,

    /// Address on the private network, once assigned
    pub private_ip: Option<String>,

    /// Public address, once assigned
    pub public_ip: Option<String>,
}

impl Droplet {
    pub fn is_active(&self) -> bool {
        self.status == DropletStatus::Active
    }
}

/// Status of a droplet
///
/// `New` and `Active` are the two values the lifecycle code branches on;
/// anything else the provider reports is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DropletStatus {
    /// Just submitted, not yet booted
    New,
    /// Running
    Active,
    /// Powered off
    Off,
    /// Destroyed but kept for billing/history
    Archive,
    /// Provider-specific value
    Other(String),
}

impl From<String> for DropletStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "new" => DropletStatus::New,
            "active" => DropletStatus::Active,
            "off" => DropletStatus::Off,
            "archive" => DropletStatus::Archive,
            _ => DropletStatus::Other(value),
        }
    }
}

impl From<&str> for DropletStatus {
    fn from(value: &str) -> Self {
        DropletStatus::from(value.to_string())
    }
}

impl From<DropletStatus> for String {
    fn from(status: DropletStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for DropletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropletStatus::New => write!(f, "new"),
            DropletStatus::Active => write!(f, "active"),
            DropletStatus::Off => write!(f, "off"),
            DropletStatus::Archive => write!(f, "archive"),
            DropletStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A private machine image (snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
}

/// Source image for a new droplet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Provider image ID (snapshots)
    Id(u64),
    /// Public distribution slug (e.g. "ubuntu-24-04-x64")
    Slug(String),
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRef::Id(id) => write!(f, "{}", id),
            ImageRef::Slug(slug) => write!(f, "{}", slug),
        }
    }
}

/// SSH key to inject, by numeric ID or fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SshKeyRef {
    Id(u64),
    Fingerprint(String),
}

/// Request for a new droplet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDroplet {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: ImageRef,
    pub private_networking: bool,
    pub ssh_keys: Vec<SshKeyRef>,
    pub user_data: Option<String>,
}
