//! Error types for gridform core types and cluster files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown instance group role: {0:?}")]
    UnknownRole(String),

    #[error("unknown subnet type: {0:?}")]
    UnknownSubnetType(String),

    #[error("unknown root volume type: {0:?}")]
    UnknownVolumeType(String),

    #[error("failed to read cluster file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cluster file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render cluster file: {0}")]
    Render(#[from] toml::ser::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
