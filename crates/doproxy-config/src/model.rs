//! Configuration model
//!
//! Mirrors the `doproxy.yml` layout. Built once at startup and passed by
//! reference to every component; never mutated afterwards.

use doproxy_cloud::{PollConfig, SshKeyRef};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process-wide configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// DigitalOcean API token
    #[serde(default)]
    pub token: String,

    /// SSH keys injected into new droplets
    #[serde(default)]
    pub ssh_key_ids: Vec<SshKeyRef>,

    /// Newline-delimited droplet IDs
    pub inventory_file: PathBuf,

    /// cloud-init user data passed to new droplets
    pub userdata_file: PathBuf,

    /// Proxy configuration template (tera syntax)
    pub haproxy_template_file: PathBuf,

    /// Rendered proxy configuration
    pub haproxy_cfg_file: PathBuf,

    /// Directory the rendered configuration is deployed into
    pub haproxy_cfg_path: PathBuf,

    pub droplet_options: DropletOptions,

    /// Command run after deploying the configuration
    #[serde(default = "default_reload_command")]
    pub reload_command: Vec<String>,

    /// API endpoint override (default: the public DigitalOcean API)
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub polling: PollingOptions,

    /// Where the hostname counter is persisted (default: `<inventory_file>.counter`)
    #[serde(default)]
    pub hostname_counter_file: Option<PathBuf>,
}

/// Parameters for new droplets
#[derive(Debug, Clone, Deserialize)]
pub struct DropletOptions {
    pub hostname_prefix: String,
    pub region: String,
    pub size: String,
    /// Base image slug for `create`
    pub image: String,
    /// Name of the droplet cloned by `clone`
    #[serde(default)]
    pub master: Option<String>,
    /// Snapshot name used by `clone`
    #[serde(default)]
    pub clone_image: Option<String>,
    /// Take a fresh snapshot on every clone even if one exists
    #[serde(default)]
    pub snapshot_overwrite: bool,
}

/// Status polling intervals
#[derive(Debug, Clone, Deserialize)]
pub struct PollingOptions {
    #[serde(default = "default_droplet_interval")]
    pub droplet_interval_secs: u64,

    #[serde(default = "default_action_interval")]
    pub action_interval_secs: u64,

    /// `None` polls until the terminal state is reached
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            droplet_interval_secs: default_droplet_interval(),
            action_interval_secs: default_action_interval(),
            max_attempts: None,
        }
    }
}

impl PollingOptions {
    pub fn droplet(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(self.droplet_interval_secs),
            self.max_attempts,
        )
    }

    pub fn action(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(self.action_interval_secs),
            self.max_attempts,
        )
    }
}

fn default_reload_command() -> Vec<String> {
    vec![
        "service".to_string(),
        "haproxy".to_string(),
        "reload".to_string(),
    ]
}

fn default_droplet_interval() -> u64 {
    15
}

fn default_action_interval() -> u64 {
    2
}

impl Config {
    /// Path of the persisted hostname counter
    pub fn hostname_counter_path(&self) -> PathBuf {
        match &self.hostname_counter_file {
            Some(path) => path.clone(),
            None => {
                let mut name = self.inventory_file.as_os_str().to_owned();
                name.push(".counter");
                PathBuf::from(name)
            }
        }
    }

    /// Path the rendered configuration is copied to
    pub fn deployed_cfg_path(&self) -> PathBuf {
        let file_name = self
            .haproxy_cfg_file
            .file_name()
            .map(Path::new)
            .unwrap_or(self.haproxy_cfg_file.as_path());
        self.haproxy_cfg_path.join(file_name)
    }
}
