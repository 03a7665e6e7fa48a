//! Contracts the model builder depends on, with in-process defaults.
//!
//! Errors from collaborators are opaque (`anyhow`) and reach the caller
//! unchanged through [`ModelError::Collaborator`](crate::ModelError).

use std::collections::BTreeMap;

use anyhow::{Context, bail};
use gridform_core::{Cluster, ClusterSubnet, InstanceGroup, InstanceGroupRole};

use crate::tasks::{TaskSet, UserDataRef};

/// Maps a zone name to the provider's availability-zone number.
pub trait ZoneMapper: Send + Sync {
    fn availability_zone(&self, zone: &str) -> anyhow::Result<String>;
}

/// Supplies the root disk size, in GiB, when a group does not set one.
pub trait VolumeSizeDefaulter: Send + Sync {
    fn default_volume_size(&self, role: InstanceGroupRole) -> anyhow::Result<u32>;
}

/// Resolves an instance group's subnet names into cluster subnets.
pub trait SubnetGatherer: Send + Sync {
    fn gather_subnets(&self, cluster: &Cluster, ig: &InstanceGroup) -> anyhow::Result<Vec<ClusterSubnet>>;
}

/// Produces the user-data handle a group's VMs boot with.
///
/// Implementations may add their own tasks (scripts, secrets) to `tasks`.
pub trait BootstrapProvider: Send + Sync {
    fn user_data(&self, tasks: &mut TaskSet, ig: &InstanceGroup) -> anyhow::Result<UserDataRef>;
}

/// Derives the tag map for a group's resources.
pub trait TagDeriver: Send + Sync {
    fn tags(&self, cluster: &Cluster, ig: &InstanceGroup) -> BTreeMap<String, String>;
}

// ── Defaults ──────────────────────────────────────────────────────

/// Azure zone names are `<region>-<number>`, e.g. `eastus-2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureZones;

impl ZoneMapper for AzureZones {
    fn availability_zone(&self, zone: &str) -> anyhow::Result<String> {
        match zone.split('-').collect::<Vec<_>>().as_slice() {
            [region, number] if !region.is_empty() && !number.is_empty() => Ok(number.to_string()),
            _ => bail!("invalid Azure zone: {zone:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DefaultVolumeSizes {
    pub control_plane: u32,
    pub node: u32,
}

impl Default for DefaultVolumeSizes {
    fn default() -> Self {
        Self {
            control_plane: 64,
            node: 128,
        }
    }
}

impl VolumeSizeDefaulter for DefaultVolumeSizes {
    fn default_volume_size(&self, role: InstanceGroupRole) -> anyhow::Result<u32> {
        Ok(match role {
            InstanceGroupRole::ControlPlane => self.control_plane,
            InstanceGroupRole::Node => self.node,
        })
    }
}

/// Looks each of the group's subnet names up in the cluster's subnet list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubnetsByName;

impl SubnetGatherer for SubnetsByName {
    fn gather_subnets(&self, cluster: &Cluster, ig: &InstanceGroup) -> anyhow::Result<Vec<ClusterSubnet>> {
        ig.spec
            .subnets
            .iter()
            .map(|name| {
                cluster
                    .subnet(name)
                    .cloned()
                    .with_context(|| format!("subnet {name:?} not found for instance group {:?}", ig.name))
            })
            .collect()
    }
}

/// Hands out a `nodeup-<group>` handle; rendering the script is left to the
/// bootstrap pipeline that consumes the task set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeupResource;

impl BootstrapProvider for NodeupResource {
    fn user_data(&self, _tasks: &mut TaskSet, ig: &InstanceGroup) -> anyhow::Result<UserDataRef> {
        Ok(UserDataRef(format!("nodeup-{}", ig.name)))
    }
}

pub const CLUSTER_TAG: &str = "KubernetesCluster";
pub const INSTANCE_GROUP_TAG: &str = "gridform.io_instancegroup";

/// Azure tag names cannot contain `/`, so well-known keys use `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudTags;

impl TagDeriver for CloudTags {
    fn tags(&self, cluster: &Cluster, ig: &InstanceGroup) -> BTreeMap<String, String> {
        let mut tags = cluster.cloud_labels.clone();
        tags.extend(ig.spec.cloud_labels.clone());
        tags.insert(CLUSTER_TAG.to_string(), cluster.name.clone());
        tags.insert(format!("k8s.io_role_{}", ig.spec.role.to_lower()), "1".to_string());
        tags.insert(INSTANCE_GROUP_TAG.to_string(), ig.name.clone());
        tags
    }
}

/// The full set of collaborators a build uses.
pub struct Collaborators {
    pub zones: Box<dyn ZoneMapper>,
    pub volume_sizes: Box<dyn VolumeSizeDefaulter>,
    pub subnets: Box<dyn SubnetGatherer>,
    pub bootstrap: Box<dyn BootstrapProvider>,
    pub tags: Box<dyn TagDeriver>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            zones: Box::new(AzureZones),
            volume_sizes: Box::new(DefaultVolumeSizes::default()),
            subnets: Box::new(SubnetsByName),
            bootstrap: Box::new(NodeupResource),
            tags: Box::new(CloudTags),
        }
    }
}

impl Collaborators {
    pub fn with_zones(mut self, zones: impl ZoneMapper + 'static) -> Self {
        self.zones = Box::new(zones);
        self
    }

    pub fn with_volume_sizes(mut self, sizes: impl VolumeSizeDefaulter + 'static) -> Self {
        self.volume_sizes = Box::new(sizes);
        self
    }

    pub fn with_subnets(mut self, subnets: impl SubnetGatherer + 'static) -> Self {
        self.subnets = Box::new(subnets);
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: impl BootstrapProvider + 'static) -> Self {
        self.bootstrap = Box::new(bootstrap);
        self
    }

    pub fn with_tags(mut self, tags: impl TagDeriver + 'static) -> Self {
        self.tags = Box::new(tags);
        self
    }
}
