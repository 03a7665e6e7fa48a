//! Model compiler error types.

use thiserror::Error;

use crate::tasks::TaskKind;

/// A cluster or instance group value that cannot be mapped onto an Azure resource.
///
/// Deterministic and fixable by the caller; always aborts the whole build.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("instance group {group:?} must have the same min and max size on Azure, but got {min} and {max}")]
    CapacityMismatch { group: String, min: u32, max: u32 },

    #[error("instance group {group:?} has a malformed image urn: {image:?}")]
    MalformedImage { group: String, image: String },

    #[error("instance group {group:?} has unsupported root volume type: {volume_type}")]
    UnsupportedVolumeType { group: String, volume_type: String },

    #[error("expected exactly one subnet for instance group {group:?}, found {found} for subnets {subnets:?}")]
    SubnetCount {
        group: String,
        found: usize,
        subnets: Vec<String>,
    },

    #[error("instance group {group:?}: expected at most one SSH public key, found {count}")]
    TooManySshKeys { group: String, count: usize },

    #[error("duplicate {kind} task: {name:?}")]
    DuplicateTask { kind: TaskKind, name: String },
}

/// Errors returned by a model build.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// An error from a collaborator (zone mapping, defaults, subnet lookup,
    /// bootstrap content), passed through untouched.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl ModelError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ModelError::Configuration(_))
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
