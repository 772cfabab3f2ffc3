//! Backend lifecycle
//!
//! Drives one droplet from creation request to `active` and commits it to
//! the fleet, or removes one from the fleet and destroys it.
//!
//! ```text
//! Requested ──create──▶ Provisioning ──poll──▶ Active ──▶ inventory + config
//!     │
//!     └── status != new ──▶ Failed (nothing committed)
//! ```
//!
//! The clone workflow prepares the source image first:
//! master shutdown ─▶ snapshot ─▶ power on (not awaited).

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::model::BackendInstance;
use crate::sync::ConfigSynchronizer;
use doproxy_cloud::{
    Action, ActionStatus, CloudError, CreateDroplet, Droplet, DropletId, DropletStatus, Image,
    InstanceProvider, PollConfig, poll_until,
};
use std::sync::Arc;

/// Lifecycle states of a create/clone request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Requested,
    Provisioning,
    Active,
    Failed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Requested => write!(f, "requested"),
            LifecycleState::Provisioning => write!(f, "provisioning"),
            LifecycleState::Active => write!(f, "active"),
            LifecycleState::Failed => write!(f, "failed"),
        }
    }
}

fn transition(name: &str, state: LifecycleState) {
    tracing::info!(droplet = %name, state = %state, "Lifecycle transition");
}

pub struct Provisioner {
    provider: Arc<dyn InstanceProvider>,
    droplet_poll: PollConfig,
    action_poll: PollConfig,
}

impl Provisioner {
    pub fn new(
        provider: Arc<dyn InstanceProvider>,
        droplet_poll: PollConfig,
        action_poll: PollConfig,
    ) -> Self {
        Self {
            provider,
            droplet_poll,
            action_poll,
        }
    }

    /// Create a droplet and wait until it is active
    ///
    /// Nothing is committed here; see `create_backend`.
    pub async fn provision(&self, request: &CreateDroplet) -> Result<Droplet> {
        transition(&request.name, LifecycleState::Requested);

        let created = self.provider.create(request).await?;
        if created.status != DropletStatus::New {
            transition(&request.name, LifecycleState::Failed);
            return Err(FleetError::UnexpectedStatus {
                id: created.id,
                status: created.status.to_string(),
            });
        }

        transition(&request.name, LifecycleState::Provisioning);

        let id = created.id;
        let provider = self.provider.as_ref();
        let droplet = poll_until(
            &self.droplet_poll,
            &format!("droplet {}", id),
            created,
            move || async move {
                provider
                    .find(id)
                    .await?
                    .ok_or_else(|| CloudError::NotFound(format!("droplet {}", id)))
            },
            Droplet::is_active,
        )
        .await?;

        transition(&request.name, LifecycleState::Active);
        Ok(droplet)
    }

    /// Provision a droplet and add it to the fleet and the proxy config
    ///
    /// Success means the droplet is active, recorded in the inventory, and
    /// the proxy has been reloaded with it.
    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn create_backend(
        &self,
        fleet: &mut Fleet,
        sync: &ConfigSynchronizer,
        request: &CreateDroplet,
    ) -> Result<Droplet> {
        let droplet = self.provision(request).await?;

        if let Err(e) = fleet.push(droplet.clone()).await {
            return Err(FleetError::inconsistent(
                format!(
                    "droplet {} is active but could not be added to the inventory",
                    droplet.id
                ),
                e,
            ));
        }

        if let Err(e) = sync.regenerate(fleet.backends()).await {
            return Err(FleetError::inconsistent(
                format!(
                    "droplet {} was added to the inventory but the proxy config was not updated",
                    droplet.id
                ),
                e,
            ));
        }

        Ok(droplet)
    }

    /// Remove the backend at `position`, reload the proxy, then destroy it
    ///
    /// The proxy stops routing to the droplet before the droplet goes away.
    #[tracing::instrument(skip(self, fleet, sync))]
    pub async fn delete_backend(
        &self,
        fleet: &mut Fleet,
        sync: &ConfigSynchronizer,
        position: i64,
    ) -> Result<BackendInstance> {
        let removed = fleet.remove_at(position).await?;

        if let Err(e) = sync.regenerate(fleet.backends()).await {
            return Err(FleetError::inconsistent(
                format!(
                    "droplet {} was removed from the inventory but the proxy config was not updated; \
                     the droplet was not destroyed",
                    removed.id
                ),
                e,
            ));
        }

        if let Err(e) = self.provider.delete(removed.id).await {
            return Err(FleetError::inconsistent(
                format!(
                    "droplet {} was removed from the inventory and proxy config but is still alive",
                    removed.id
                ),
                e.into(),
            ));
        }

        Ok(removed)
    }

    /// Resolve (and if needed create) the snapshot image of the master droplet
    #[tracing::instrument(skip(self))]
    pub async fn prepare_clone_image(
        &self,
        master: &str,
        image_name: &str,
        overwrite: bool,
    ) -> Result<Image> {
        let master_droplet = self
            .provider
            .list_all()
            .await?
            .into_iter()
            .find(|d| d.name == master)
            .ok_or_else(|| FleetError::MasterNotFound(master.to_string()))?;

        tracing::debug!("Found master {} ({})", master_droplet.name, master_droplet.id);

        let mut image = self.find_image(image_name).await?;

        if image.is_none() || overwrite {
            self.snapshot_master(master_droplet.id, image_name).await?;
            image = self.find_image(image_name).await?;
        }

        image.ok_or_else(|| FleetError::ImageNotMaterialized(image_name.to_string()))
    }

    /// Shutdown, snapshot and power the master back on
    async fn snapshot_master(&self, master: DropletId, image_name: &str) -> Result<()> {
        tracing::info!("Shutting down master {}", master);
        let result = self.shutdown_and_snapshot(master, image_name).await;

        // The master may be off whenever a shutdown was requested
        self.power_on(master).await;
        result
    }

    async fn shutdown_and_snapshot(&self, master: DropletId, image_name: &str) -> Result<()> {
        match self.provider.shutdown(master).await {
            Ok(action) => {
                self.await_action(action).await?;
            }
            Err(CloudError::Unprocessable(message)) => {
                tracing::warn!("Shutdown was not processed: {}", message);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Creating snapshot {} of master {}", image_name, master);
        let action = self.provider.snapshot(master, image_name).await?;
        self.await_action(action).await?;
        Ok(())
    }

    /// Request a power-on without waiting for it to complete
    async fn power_on(&self, id: DropletId) {
        match self.provider.power_on(id).await {
            Ok(action) => tracing::info!("Power-on of {} requested (action {})", id, action.id),
            Err(e) => tracing::warn!("Power-on of {} failed: {}", id, e),
        }
    }

    async fn await_action(&self, action: Action) -> Result<Action> {
        let id = action.id;
        let provider = self.provider.as_ref();
        let finished = poll_until(
            &self.action_poll,
            &format!("{} action {}", action.kind, id),
            action,
            move || provider.find_action(id),
            Action::is_finished,
        )
        .await?;

        match &finished.status {
            ActionStatus::Failed(reason) => Err(CloudError::ActionFailed {
                action: format!("{} {}", finished.kind, finished.id),
                reason: reason.clone(),
            }
            .into()),
            _ => Ok(finished),
        }
    }

    /// Newest private image called `name`
    async fn find_image(&self, name: &str) -> Result<Option<Image>> {
        Ok(self
            .provider
            .list_private_images()
            .await?
            .into_iter()
            .filter(|i| i.name == name)
            .max_by_key(|i| i.id))
    }
}
