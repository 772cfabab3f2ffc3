//! Fleet manager
//!
//! Top-level entry point used by the command line. Owns the fleet, the
//! provisioner and the config synchronizer and never touches the inventory
//! or the proxy configuration directly.

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::hostname::HostnameAllocator;
use crate::inventory::InventoryStore;
use crate::lifecycle::Provisioner;
use crate::model::BackendInstance;
use crate::sync::{ConfigSynchronizer, Reloader};
use doproxy_cloud::{CreateDroplet, ImageRef, InstanceProvider, PollConfig};
use doproxy_config::Config;
use std::sync::Arc;

pub const EMPTY_INVENTORY_MESSAGE: &str = "The inventory file is empty. Use the create command.";

pub struct FleetManager {
    config: Arc<Config>,
    provider: Arc<dyn InstanceProvider>,
    fleet: Fleet,
    provisioner: Provisioner,
    sync: ConfigSynchronizer,
    hostnames: HostnameAllocator,
}

impl FleetManager {
    /// Load the inventory and resolve every backend
    ///
    /// Fails before any command runs if the inventory file is missing or
    /// lists a droplet the provider does not know.
    pub async fn open(
        config: Arc<Config>,
        provider: Arc<dyn InstanceProvider>,
        reloader: Arc<dyn Reloader>,
    ) -> Result<Self> {
        let store = InventoryStore::new(&config.inventory_file);
        let fleet = Fleet::open(store, provider.as_ref()).await?;

        let provisioner = Provisioner::new(
            provider.clone(),
            config.polling.droplet(),
            config.polling.action(),
        );
        let sync = ConfigSynchronizer::from_config(&config, reloader);
        let hostnames = HostnameAllocator::new(
            &config.droplet_options.hostname_prefix,
            config.hostname_counter_path(),
        );

        Ok(Self {
            config,
            provider,
            fleet,
            provisioner,
            sync,
            hostnames,
        })
    }

    /// Replace the polling configuration
    pub fn with_polling(mut self, droplet: PollConfig, action: PollConfig) -> Self {
        self.provisioner = Provisioner::new(self.provider.clone(), droplet, action);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backends(&self) -> &[BackendInstance] {
        self.fleet.backends()
    }

    /// Inventory listing, one line per backend
    pub fn print_inventory(&self) -> String {
        if self.fleet.is_empty() {
            return format!("{}\n", EMPTY_INVENTORY_MESSAGE);
        }

        self.fleet
            .backends()
            .iter()
            .enumerate()
            .map(|(ordinal, backend)| format!("{}\n", backend.describe(ordinal)))
            .collect()
    }

    /// Provision a new backend from the base image
    pub async fn create(&mut self) -> Result<BackendInstance> {
        self.sync.validate()?;
        let user_data = self.read_user_data().await?;

        let image = ImageRef::Slug(self.config.droplet_options.image.clone());
        let request = self.request(image, user_data).await?;

        self.commit(request).await
    }

    /// Provision a new backend from a snapshot of the master droplet
    pub async fn clone(&mut self) -> Result<BackendInstance> {
        let options = &self.config.droplet_options;
        let master = options.master.clone().ok_or_else(|| {
            FleetError::Configuration("droplet_options.master is not set".to_string())
        })?;
        let image_name = options.clone_image.clone().ok_or_else(|| {
            FleetError::Configuration("droplet_options.clone_image is not set".to_string())
        })?;
        let overwrite = options.snapshot_overwrite;

        self.sync.validate()?;
        let user_data = self.read_user_data().await?;

        let image = self
            .provisioner
            .prepare_clone_image(&master, &image_name, overwrite)
            .await?;

        tracing::info!("Creating droplet from snapshot {} ({})", image.name, image.id);
        let request = self.request(ImageRef::Id(image.id), user_data).await?;

        self.commit(request).await
    }

    /// Remove the backend at `position` and destroy its droplet
    pub async fn delete(&mut self, position: i64) -> Result<BackendInstance> {
        self.sync.validate()?;
        self.provisioner
            .delete_backend(&mut self.fleet, &self.sync, position)
            .await
    }

    /// Regenerate, deploy and reload without touching the inventory
    pub async fn reload(&self) -> Result<()> {
        self.sync.regenerate(self.fleet.backends()).await
    }

    /// Render the proxy configuration only
    pub async fn generate(&self) -> Result<String> {
        self.sync.generate(self.fleet.backends()).await
    }

    async fn commit(&mut self, request: CreateDroplet) -> Result<BackendInstance> {
        let droplet = self
            .provisioner
            .create_backend(&mut self.fleet, &self.sync, &request)
            .await?;
        Ok(BackendInstance::from(droplet))
    }

    async fn request(&self, image: ImageRef, user_data: String) -> Result<CreateDroplet> {
        let name = self.hostnames.next(&self.fleet.names()).await?;
        let options = &self.config.droplet_options;

        Ok(CreateDroplet {
            name,
            region: options.region.clone(),
            size: options.size.clone(),
            image,
            private_networking: true,
            ssh_keys: self.config.ssh_key_ids.clone(),
            user_data: Some(user_data),
        })
    }

    async fn read_user_data(&self) -> Result<String> {
        let path = &self.config.userdata_file;
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FleetError::io(path, e))
    }
}
