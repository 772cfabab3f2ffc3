pub mod error;
pub mod model;

pub use error::*;
pub use model::{Config, DropletOptions, PollingOptions};

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a configuration file
pub const CONFIG_PATH_ENV: &str = "DOPROXY_CONFIG";

/// Environment variable overriding the `token` key
pub const TOKEN_ENV: &str = "DIGITALOCEAN_TOKEN";

const CANDIDATES: [&str; 2] = ["doproxy.yml", ".doproxy.yml"];

/// Locate the configuration file
///
/// Search order:
/// 1. `explicit` (the `--config` flag)
/// 2. Environment variable DOPROXY_CONFIG
/// 3. Current directory: doproxy.yml, .doproxy.yml
/// 4. ~/.config/doproxy/doproxy.yml
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("doproxy").join("doproxy.yml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::NoConfigFile)
}

/// Find and load the configuration
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = find_config_file(explicit)?;
    load_from_path(&path)
}

/// Load the configuration from a specific file
pub fn load_from_path(path: &Path) -> Result<Config> {
    tracing::debug!("Loading configuration from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: Config =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            tracing::debug!("Using API token from {}", TOKEN_ENV);
            config.token = token;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.token.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "no API token: set `token` or {}",
            TOKEN_ENV
        )));
    }

    if config.droplet_options.hostname_prefix.is_empty() {
        return Err(ConfigError::Invalid(
            "droplet_options.hostname_prefix must not be empty".to_string(),
        ));
    }

    if config.reload_command.is_empty() {
        return Err(ConfigError::Invalid(
            "reload_command must name a program".to_string(),
        ));
    }

    if config.polling.droplet_interval_secs == 0 || config.polling.action_interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "polling intervals must be at least one second".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doproxy_cloud::SshKeyRef;
    use serial_test::serial;
    use std::fs;
    use std::time::Duration;

    const SAMPLE: &str = r#"
token: abc123
ssh_key_ids:
  - 230630
  - "3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa"
inventory_file: inventory
userdata_file: user-data.yml
haproxy_template_file: haproxy.cfg.tera
haproxy_cfg_file: haproxy.cfg
haproxy_cfg_path: /etc/haproxy
droplet_options:
  hostname_prefix: auto-nginx
  region: nyc3
  size: 1gb
  image: ubuntu-24-04-x64
  master: nginx-master
  clone_image: nginx-clone
"#;

    fn write_sample(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("doproxy.yml");
        fs::write(&path, content).unwrap();
        path
    }

    /// The sample configuration loads
    #[test]
    #[serial]
    fn test_load_sample() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), SAMPLE);

        let config = load_from_path(&path).unwrap();

        assert_eq!(config.token, "abc123");
        assert_eq!(
            config.ssh_key_ids,
            vec![
                SshKeyRef::Id(230630),
                SshKeyRef::Fingerprint("3b:16:bf:e4:8b:00:8b:b8:59:8c:a9:d3:f0:19:45:fa".into())
            ]
        );
        assert_eq!(config.droplet_options.master.as_deref(), Some("nginx-master"));
        assert!(!config.droplet_options.snapshot_overwrite);
        assert_eq!(config.reload_command, vec!["service", "haproxy", "reload"]);
        assert_eq!(config.api_url, None);
    }

    /// `api_url` overrides the API endpoint
    #[test]
    #[serial]
    fn test_api_url_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(
            temp_dir.path(),
            &format!("{}api_url: http://127.0.0.1:8080\n", SAMPLE),
        );

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://127.0.0.1:8080"));
    }

    /// Polling is unbounded by default
    #[test]
    #[serial]
    fn test_polling_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), SAMPLE);

        let config = load_from_path(&path).unwrap();

        assert_eq!(config.polling.droplet().interval, Duration::from_secs(15));
        assert_eq!(config.polling.action().interval, Duration::from_secs(2));
        assert_eq!(config.polling.droplet().max_attempts, None);
    }

    /// Deployed path and counter file derive from the configured paths
    #[test]
    #[serial]
    fn test_derived_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), SAMPLE);

        let config = load_from_path(&path).unwrap();

        assert_eq!(
            config.hostname_counter_path(),
            PathBuf::from("inventory.counter")
        );
        assert_eq!(
            config.deployed_cfg_path(),
            PathBuf::from("/etc/haproxy/haproxy.cfg")
        );
    }

    /// A token is required
    #[test]
    #[serial]
    fn test_missing_token_is_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), &SAMPLE.replace("token: abc123", ""));

        let result = load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    /// DIGITALOCEAN_TOKEN overrides the file
    #[test]
    #[serial]
    fn test_token_env_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), SAMPLE);

        unsafe {
            std::env::set_var(TOKEN_ENV, "from-env");
        }

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.token, "from-env");

        unsafe {
            std::env::remove_var(TOKEN_ENV);
        }
    }

    /// Malformed YAML is a parse error
    #[test]
    #[serial]
    fn test_malformed_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path(), "token: [unclosed");

        let result = load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    /// doproxy.yml in the working directory is found
    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        write_sample(temp_dir.path(), SAMPLE);

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file(None).unwrap();
        assert!(result.ends_with("doproxy.yml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    /// DOPROXY_CONFIG is used when set
    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yml");
        fs::write(&config_path, SAMPLE).unwrap();

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        }

        let result = find_config_file(None).unwrap();
        assert_eq!(result, config_path);

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }

    /// --config beats the environment
    #[test]
    #[serial]
    fn test_explicit_path_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let explicit = temp_dir.path().join("explicit.yml");
        fs::write(&explicit, SAMPLE).unwrap();

        let result = find_config_file(Some(&explicit)).unwrap();
        assert_eq!(result, explicit);

        let missing = temp_dir.path().join("missing.yml");
        assert!(matches!(
            find_config_file(Some(&missing)),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
