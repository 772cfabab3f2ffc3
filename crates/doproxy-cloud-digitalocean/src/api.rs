//! DigitalOcean API wire types
//!
//! Everything here mirrors the JSON the API sends and receives. Conversion
//! into `doproxy_cloud` types happens in the `From` impls at the bottom, so
//! nothing outside this module sees a raw payload.

use doproxy_cloud::{Action, ActionStatus, CreateDroplet, Droplet, Image, ImageRef, SshKeyRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DropletEnvelope {
    pub droplet: ApiDroplet,
}

#[derive(Debug, Deserialize)]
pub struct DropletPage {
    #[serde(default)]
    pub droplets: Vec<ApiDroplet>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Deserialize)]
pub struct ImagePage {
    #[serde(default)]
    pub images: Vec<ApiImage>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Deserialize)]
pub struct ActionEnvelope {
    pub action: ApiAction,
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pages {
    pub next: Option<String>,
}

impl Links {
    pub fn has_next(&self) -> bool {
        self.pages.as_ref().is_some_and(|p| p.next.is_some())
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiDroplet {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub networks: Networks,
}

#[derive(Debug, Default, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

#[derive(Debug, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl Networks {
    fn address(&self, kind: &str) -> Option<String> {
        self.v4
            .iter()
            .find(|n| n.r#type == kind)
            .map(|n| n.ip_address.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiImage {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiAction {
    pub id: u64,
    pub status: String,
    #[serde(rename = "type", default)]
    pub r#type: String,
}

#[derive(Debug, Serialize)]
pub struct CreateDropletRequest<'a> {
    pub name: &'a str,
    pub region: &'a str,
    pub size: &'a str,
    pub image: &'a ImageRef,
    pub ssh_keys: &'a [SshKeyRef],
    pub private_networking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<&'a str>,
}

impl<'a> From<&'a CreateDroplet> for CreateDropletRequest<'a> {
    fn from(request: &'a CreateDroplet) -> Self {
        Self {
            name: &request.name,
            region: &request.region,
            size: &request.size,
            image: &request.image,
            ssh_keys: &request.ssh_keys,
            private_networking: request.private_networking,
            user_data: request.user_data.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActionRequest<'a> {
    #[serde(rename = "type")]
    pub r#type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

impl From<ApiDroplet> for Droplet {
    fn from(d: ApiDroplet) -> Self {
        Self {
            private_ip: d.networks.address("private"),
            public_ip: d.networks.address("public"),
            id: d.id,
            name: d.name,
            status: d.status.into(),
        }
    }
}

impl From<ApiImage> for Image {
    fn from(i: ApiImage) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}

/// Map DigitalOcean action states ("in-progress", "completed", "errored")
pub fn action_status(status: &str) -> ActionStatus {
    match status {
        "completed" => ActionStatus::Completed,
        "in-progress" => ActionStatus::Pending,
        other => ActionStatus::Failed(other.to_string()),
    }
}

impl From<ApiAction> for Action {
    fn from(a: ApiAction) -> Self {
        Self {
            id: a.id,
            status: action_status(&a.status),
            kind: a.r#type,
        }
    }
}
