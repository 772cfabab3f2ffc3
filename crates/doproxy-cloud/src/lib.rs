//! doproxy Cloud Boundary
//!
//! This crate defines the provider-neutral view of the machines doproxy
//! manages: droplets, private images and asynchronous actions, plus the
//! `InstanceProvider` trait every cloud backend implements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  doproxy CLI                     │
//! │        (print/create/clone/delete/reload)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                doproxy-core                      │
//! │   inventory · lifecycle · proxy config sync      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               doproxy-cloud                      │
//! │  trait InstanceProvider { ... }   poll_until()   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼────────┐
//!           │  digitalocean  │
//!           │    provider    │
//!           └────────────────┘
//! ```

pub mod action;
pub mod droplet;
pub mod error;
pub mod poll;
pub mod provider;

// Re-exports
pub use action::{Action, ActionId, ActionStatus};
pub use droplet::{CreateDroplet, Droplet, DropletId, DropletStatus, Image, ImageRef, SshKeyRef};
pub use error::{CloudError, Result};
pub use poll::{PollConfig, poll_until};
pub use provider::InstanceProvider;
