//! DigitalOcean provider for doproxy
//!
//! This crate implements the `InstanceProvider` trait on top of the
//! DigitalOcean v2 REST API, using Bearer token authentication.
//!
//! # Features
//!
//! - Droplet management (find, create, delete, list)
//! - Private image (snapshot) listing
//! - Droplet actions (shutdown, snapshot, power on) and action polling
//!
//! # Example
//!
//! ```ignore
//! use doproxy_cloud::InstanceProvider;
//! use doproxy_cloud_digitalocean::DigitalOceanProvider;
//!
//! let provider = DigitalOceanProvider::new("dop_v1_...");
//!
//! let droplets = provider.list_all().await?;
//! for droplet in droplets {
//!     println!("{} {}", droplet.id, droplet.name);
//! }
//! ```

pub mod api;
pub mod client;
pub mod provider;

pub use client::{DEFAULT_API_URL, DigitalOceanClient};
pub use provider::DigitalOceanProvider;
