//! Proxy configuration template rendering
//!
//! Uses Tera to render the proxy configuration from the backend list.
//!
//! The template sees two variables:
//! - `backends`: list of `{ ordinal, id, name, private_ip, public_ip, status }`
//! - `config`: `{ hostname_prefix, region, size, image, haproxy_cfg_path }`

use crate::error::{FleetError, Result};
use crate::model::BackendInstance;
use doproxy_config::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Static values exposed to the template as `config`
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSettings {
    pub hostname_prefix: String,
    pub region: String,
    pub size: String,
    pub image: String,
    pub haproxy_cfg_path: String,
}

impl From<&Config> for TemplateSettings {
    fn from(config: &Config) -> Self {
        Self {
            hostname_prefix: config.droplet_options.hostname_prefix.clone(),
            region: config.droplet_options.region.clone(),
            size: config.droplet_options.size.clone(),
            image: config.droplet_options.image.clone(),
            haproxy_cfg_path: config.haproxy_cfg_path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
struct BackendView<'a> {
    ordinal: usize,
    #[serde(flatten)]
    backend: &'a BackendInstance,
}

/// Proxy configuration template on disk
#[derive(Debug, Clone)]
pub struct ProxyTemplate {
    path: PathBuf,
    settings: TemplateSettings,
}

impl ProxyTemplate {
    pub fn new(path: impl Into<PathBuf>, settings: TemplateSettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| FleetError::Template {
            path: self.path.clone(),
            message: format!("cannot read template: {}", e),
        })
    }

    /// Check that the template exists and parses
    pub fn validate(&self) -> Result<()> {
        let source = self.source()?;
        let mut tera = Tera::default();
        tera.add_raw_template("proxy", &source)
            .map_err(|e| self.error(&e))?;
        Ok(())
    }

    /// Render against `backends`
    pub fn render(&self, backends: &[BackendInstance]) -> Result<String> {
        let source = self.source()?;

        let views: Vec<BackendView<'_>> = backends
            .iter()
            .enumerate()
            .map(|(ordinal, backend)| BackendView { ordinal, backend })
            .collect();

        let mut context = Context::new();
        context.insert("backends", &views);
        context.insert("config", &self.settings);

        let mut tera = Tera::default();
        tera.render_str(&source, &context)
            .map_err(|e| self.error(&e))
    }

    fn error(&self, e: &tera::Error) -> FleetError {
        FleetError::Template {
            path: self.path.clone(),
            message: extract_tera_error_detail(e),
        }
    }
}

/// Flatten a Tera error chain into one readable message
fn extract_tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }

    let full_error = details.join(" | ");

    if let Some(start) = full_error.find("Variable `")
        && let Some(end) = full_error[start..].find("` not found")
    {
        let var_name = &full_error[start + 10..start + end];
        return format!(
            "undefined variable `{}`\nhint: available variables are `backends` and `config`",
            var_name
        );
    }

    full_error
}
