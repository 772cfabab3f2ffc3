//! Proxy configuration synchronization
//!
//! Renders the configuration from the current backends, replaces the output
//! file atomically, copies it into the deployment directory and runs the
//! reload command. The synchronizer is the only writer of both files.

use crate::atomic::write_atomic;
use crate::error::{FleetError, Result};
use crate::model::BackendInstance;
use crate::template::{ProxyTemplate, TemplateSettings};
use async_trait::async_trait;
use doproxy_config::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::process::Command;

/// Mechanism that makes the proxy pick up a deployed configuration
#[async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self) -> Result<()>;
}

/// Runs an external command (e.g. `service haproxy reload`)
///
/// The exit status is logged but not treated as a failure; only a command
/// that cannot be started is an error.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    argv: Vec<String>,
}

impl CommandReloader {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

#[async_trait]
impl Reloader for CommandReloader {
    async fn reload(&self) -> Result<()> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(FleetError::Configuration(
                "reload command is empty".to_string(),
            ));
        };

        tracing::info!("Running reload command: {}", self.argv.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| FleetError::io(program, e))?;

        if !status.success() {
            tracing::warn!("Reload command exited with {}", status);
        }
        Ok(())
    }
}

pub struct ConfigSynchronizer {
    template: ProxyTemplate,
    output: PathBuf,
    deployed: PathBuf,
    reloader: Arc<dyn Reloader>,
}

impl ConfigSynchronizer {
    pub fn new(
        template: ProxyTemplate,
        output: impl Into<PathBuf>,
        deployed: impl Into<PathBuf>,
        reloader: Arc<dyn Reloader>,
    ) -> Self {
        Self {
            template,
            output: output.into(),
            deployed: deployed.into(),
            reloader,
        }
    }

    pub fn from_config(config: &Config, reloader: Arc<dyn Reloader>) -> Self {
        Self::new(
            ProxyTemplate::new(
                &config.haproxy_template_file,
                TemplateSettings::from(config),
            ),
            &config.haproxy_cfg_file,
            config.deployed_cfg_path(),
            reloader,
        )
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn deployed_path(&self) -> &Path {
        &self.deployed
    }

    /// Check the template before anything is mutated
    pub fn validate(&self) -> Result<()> {
        self.template.validate()
    }

    /// Render and write the output file only
    pub async fn generate(&self, backends: &[BackendInstance]) -> Result<String> {
        let rendered = self.template.render(backends)?;
        write_atomic(&self.output, rendered.as_bytes()).await?;

        tracing::info!(
            "Generated {} with {} backends",
            self.output.display(),
            backends.len()
        );
        Ok(rendered)
    }

    /// Render, deploy and reload
    ///
    /// The deployed file is overwritten in place, keeping its inode and owner.
    pub async fn regenerate(&self, backends: &[BackendInstance]) -> Result<()> {
        self.generate(backends).await?;

        fs::copy(&self.output, &self.deployed)
            .await
            .map_err(|e| FleetError::io(&self.deployed, e))?;
        tracing::info!("Deployed {}", self.deployed.display());

        self.reloader.reload().await
    }
}
