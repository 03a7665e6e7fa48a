//! gridform-azure — Azure model compiler.
//!
//! Compiles a cluster's instance groups into VM Scale Set tasks with explicit
//! links to the resource group, virtual network, subnet, application security
//! groups and load balancer they depend on. The build is a pure function of
//! its inputs; applying the tasks is left to a reconciliation engine.
//!
//! # Components
//!
//! - **`capacity`** — Fixed scale set size from min/max bounds
//! - **`image`** — Image URN / resource id parsing
//! - **`storage`** — Storage profile (image + ephemeral OS disk)
//! - **`network`** — Subnet selection and public-IP policy
//! - **`security`** — Per-role application security groups
//! - **`roles`** — Built-in role assignments for scale set identities
//! - **`builder`** — Per-group orchestration into a [`TaskSet`]
//! - **`collaborators`** — Zone, defaults, subnet, bootstrap and tag contracts

pub mod builder;
pub mod capacity;
pub mod collaborators;
pub mod context;
pub mod error;
pub mod image;
pub mod network;
pub mod roles;
pub mod security;
pub mod storage;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use builder::{VmScaleSetModelBuilder, build_tasks};
pub use collaborators::{
    AzureZones, BootstrapProvider, CloudTags, Collaborators, DefaultVolumeSizes, NodeupResource,
    SubnetGatherer, SubnetsByName, TagDeriver, VolumeSizeDefaulter, ZoneMapper,
};
pub use context::AzureModelContext;
pub use error::{ConfigurationError, ModelError, ModelResult};
pub use image::ImageReference;
pub use storage::{OsDisk, StorageProfile};
pub use tasks::{Lifecycle, Task, TaskKind, TaskLink, TaskSet, UserDataRef, VmScaleSet};
