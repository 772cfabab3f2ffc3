//! doproxy Core
//!
//! Keeps the inventory file, the rendered proxy configuration and the live
//! droplets in step with each other.

mod atomic;
pub mod error;
pub mod fleet;
pub mod hostname;
pub mod inventory;
pub mod lifecycle;
pub mod manager;
pub mod model;
pub mod sync;
pub mod template;

pub use error::*;
pub use fleet::Fleet;
pub use hostname::HostnameAllocator;
pub use inventory::InventoryStore;
pub use lifecycle::{LifecycleState, Provisioner};
pub use manager::{EMPTY_INVENTORY_MESSAGE, FleetManager};
pub use model::BackendInstance;
pub use sync::{CommandReloader, ConfigSynchronizer, Reloader};
pub use template::{ProxyTemplate, TemplateSettings};
