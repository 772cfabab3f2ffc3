//! In-memory mirror of the inventory
//!
//! `Fleet` pairs the inventory file with the resolved backend list and is
//! the only place either is mutated. Both sides always have the same length
//! and order; every mutation writes the file first and then updates memory.

use crate::error::{FleetError, Result};
use crate::inventory::{InventoryStore, checked_index};
use crate::model::BackendInstance;
use doproxy_cloud::{Droplet, InstanceProvider};

#[derive(Debug)]
pub struct Fleet {
    store: InventoryStore,
    backends: Vec<BackendInstance>,
}

impl Fleet {
    /// Load the inventory and resolve every ID through the provider
    ///
    /// Any ID the provider does not know is a configuration error.
    pub async fn open(store: InventoryStore, provider: &dyn InstanceProvider) -> Result<Self> {
        let ids = store.load().await?;
        let mut backends = Vec::with_capacity(ids.len());

        for id in ids {
            let droplet = provider.find(id).await?.ok_or_else(|| {
                FleetError::Configuration(format!(
                    "Inventory file contains a non-existent droplet id ({})!",
                    id
                ))
            })?;
            backends.push(BackendInstance::from(droplet));
        }

        tracing::debug!("Loaded {} backends from inventory", backends.len());
        Ok(Self { store, backends })
    }

    pub fn backends(&self) -> &[BackendInstance] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Append an active droplet to the file, then to memory
    pub(crate) async fn push(&mut self, droplet: Droplet) -> Result<()> {
        self.store.append(droplet.id).await?;
        self.backends.push(BackendInstance::from(droplet));
        Ok(())
    }

    /// Remove the backend at `position` from the file, then from memory
    pub(crate) async fn remove_at(&mut self, position: i64) -> Result<BackendInstance> {
        let index = checked_index(position, self.backends.len())?;

        let ids = self.store.load().await?;
        if ids.len() != self.backends.len() || ids[index] != self.backends[index].id {
            return Err(FleetError::Configuration(format!(
                "Inventory file {} changed underneath this process; refusing to delete line {}",
                self.store.path().display(),
                index
            )));
        }

        self.store.remove_at(position).await?;
        Ok(self.backends.remove(index))
    }
}
