//! Error types
//!
//! The simulation itself never fails. Errors only come from the edges:
//! reading configuration files and writing CLI output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwarmError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Neither TOML nor JSON could make sense of the config text
    #[error("Config parse error: {0}")]
    ConfigParse(String),
    /// Config could not be rendered back to TOML
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SwarmResult<T> = Result<T, SwarmError>;
