use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked in:\n\
        - ./doproxy.yml, ./.doproxy.yml\n\
        - ~/.config/doproxy/doproxy.yml\n\
        Use --config <path> or the DOPROXY_CONFIG environment variable to point at one"
    )]
    NoConfigFile,

    #[error("Configuration file does not exist: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
