//! Instance provider trait definition

use crate::action::{Action, ActionId};
use crate::droplet::{CreateDroplet, Droplet, DropletId, Image};
use crate::error::Result;
use async_trait::async_trait;

/// Cloud provider abstraction trait
///
/// The lifecycle code only talks to the cloud through this trait, so every
/// provider response it sees has already been normalized into the types of
/// this crate.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// Returns the provider name (e.g., "digitalocean")
    fn name(&self) -> &str;

    /// Look up a droplet. `Ok(None)` means the provider does not know the ID.
    async fn find(&self, id: DropletId) -> Result<Option<Droplet>>;

    /// Submit a droplet creation request
    async fn create(&self, request: &CreateDroplet) -> Result<Droplet>;

    /// Destroy a droplet
    async fn delete(&self, id: DropletId) -> Result<()>;

    /// List every droplet on the account
    async fn list_all(&self) -> Result<Vec<Droplet>>;

    /// List private (user-created) images
    async fn list_private_images(&self) -> Result<Vec<Image>>;

    /// Start a graceful shutdown
    async fn shutdown(&self, id: DropletId) -> Result<Action>;

    /// Start a snapshot named `name`
    async fn snapshot(&self, id: DropletId, name: &str) -> Result<Action>;

    /// Start a power-on
    async fn power_on(&self, id: DropletId) -> Result<Action>;

    /// Refresh the status of a previously started action
    async fn find_action(&self, id: ActionId) -> Result<Action>;
}
