//! gridform-core — cluster and instance-group model shared by the
//! provider model compilers and the CLI.

pub mod config;
pub mod error;
pub mod types;

pub use config::ClusterConfig;
pub use error::{CoreError, CoreResult};
pub use types::*;
