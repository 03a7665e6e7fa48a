//! Cluster and instance-group types shared across gridform crates.
//!
//! Everything that the provider model compilers switch on (roles, subnet
//! tiers, volume types) is a closed enum. Unknown strings are rejected when
//! the value is constructed, never deep inside a compiler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Cluster names with this suffix use gossip rather than DNS for discovery.
pub const GOSSIP_SUFFIX: &str = ".k8s.local";

// ── Roles ─────────────────────────────────────────────────────────

/// What an instance group runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstanceGroupRole {
    ControlPlane,
    Node,
}

impl InstanceGroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceGroupRole::ControlPlane => "ControlPlane",
            InstanceGroupRole::Node => "Node",
        }
    }

    /// Lowercase form used in resource names and tags.
    pub fn to_lower(&self) -> &'static str {
        match self {
            InstanceGroupRole::ControlPlane => "control-plane",
            InstanceGroupRole::Node => "node",
        }
    }
}

impl fmt::Display for InstanceGroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceGroupRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ControlPlane" => Ok(InstanceGroupRole::ControlPlane),
            "Node" => Ok(InstanceGroupRole::Node),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

// ── Subnets ───────────────────────────────────────────────────────

/// Network exposure tier of a subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubnetType {
    Public,
    Utility,
    DualStack,
    Private,
}

impl SubnetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetType::Public => "Public",
            SubnetType::Utility => "Utility",
            SubnetType::DualStack => "DualStack",
            SubnetType::Private => "Private",
        }
    }
}

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubnetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Public" => Ok(SubnetType::Public),
            "Utility" => Ok(SubnetType::Utility),
            "DualStack" => Ok(SubnetType::DualStack),
            "Private" => Ok(SubnetType::Private),
            other => Err(CoreError::UnknownSubnetType(other.to_string())),
        }
    }
}

/// A subnet declared on the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterSubnet {
    pub name: String,
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
    /// Provider resource id for subnets that already exist.
    pub id: Option<String>,
    pub cidr: Option<String>,
}

// ── Root volumes ──────────────────────────────────────────────────

/// Root volume types, named as the provider names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootVolumeType {
    /// OS disk materialized from the image on the VM's local cache disk.
    EphemeralOnOSCache,
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "StandardSSD_LRS")]
    StandardSsdLrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
    #[serde(rename = "Premium_ZRS")]
    PremiumZrs,
    #[serde(rename = "StandardSSD_ZRS")]
    StandardSsdZrs,
    #[serde(rename = "UltraSSD_LRS")]
    UltraSsdLrs,
}

impl RootVolumeType {
    pub const ALL: [RootVolumeType; 7] = [
        RootVolumeType::EphemeralOnOSCache,
        RootVolumeType::StandardLrs,
        RootVolumeType::StandardSsdLrs,
        RootVolumeType::PremiumLrs,
        RootVolumeType::PremiumZrs,
        RootVolumeType::StandardSsdZrs,
        RootVolumeType::UltraSsdLrs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RootVolumeType::EphemeralOnOSCache => "EphemeralOnOSCache",
            RootVolumeType::StandardLrs => "Standard_LRS",
            RootVolumeType::StandardSsdLrs => "StandardSSD_LRS",
            RootVolumeType::PremiumLrs => "Premium_LRS",
            RootVolumeType::PremiumZrs => "Premium_ZRS",
            RootVolumeType::StandardSsdZrs => "StandardSSD_ZRS",
            RootVolumeType::UltraSsdLrs => "UltraSSD_LRS",
        }
    }
}

impl fmt::Display for RootVolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootVolumeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RootVolumeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVolumeType(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RootVolumeSpec {
    #[serde(rename = "type")]
    pub volume_type: Option<RootVolumeType>,
    /// Size in GiB.
    pub size: Option<u32>,
}

// ── Instance groups ───────────────────────────────────────────────

/// A named, homogeneous set of nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceGroup {
    pub name: String,
    pub spec: InstanceGroupSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceGroupSpec {
    pub role: InstanceGroupRole,
    /// Zones in the order the group should span them.
    #[serde(default)]
    pub zones: Vec<String>,
    pub machine_type: String,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    /// Image URN (`publisher:offer:sku:version`) or provider resource id.
    pub image: String,
    /// Names of cluster subnets this group is placed in.
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Overrides the subnet tier's default public-IP behaviour.
    pub associate_public_ip: Option<bool>,
    pub root_volume: Option<RootVolumeSpec>,
    #[serde(default)]
    pub cloud_labels: BTreeMap<String, String>,
}

impl InstanceGroup {
    pub fn is_control_plane(&self) -> bool {
        self.spec.role == InstanceGroupRole::ControlPlane
    }
}

// ── Cluster ───────────────────────────────────────────────────────

/// How cluster members find the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DnsType {
    #[default]
    Public,
    Private,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadBalancerType {
    Public,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancerAccessSpec {
    #[serde(rename = "type")]
    pub lb_type: LoadBalancerType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiSpec {
    /// Declares a load balancer in front of the API servers.
    pub load_balancer: Option<LoadBalancerAccessSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AzureSpec {
    /// Falls back to the cluster name when unset.
    pub resource_group_name: Option<String>,
    /// Falls back to the cluster name when unset.
    pub virtual_network_name: Option<String>,
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
}

impl Default for AzureSpec {
    fn default() -> Self {
        Self {
            resource_group_name: None,
            virtual_network_name: None,
            admin_user: default_admin_user(),
        }
    }
}

fn default_admin_user() -> String {
    "azureuser".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    pub name: String,
    #[serde(default)]
    pub dns: DnsType,
    #[serde(default)]
    pub azure: AzureSpec,
    #[serde(default)]
    pub api: ApiSpec,
    #[serde(default)]
    pub subnets: Vec<ClusterSubnet>,
    #[serde(default)]
    pub cloud_labels: BTreeMap<String, String>,
}

impl Cluster {
    pub fn is_gossip(&self) -> bool {
        self.name.ends_with(GOSSIP_SUFFIX)
    }

    /// Gossip clusters that still publish DNS rely on legacy peer discovery,
    /// which needs every node to read cluster state from storage.
    pub fn uses_legacy_gossip(&self) -> bool {
        self.is_gossip() && self.dns != DnsType::None
    }

    pub fn subnet(&self, name: &str) -> Option<&ClusterSubnet> {
        self.subnets.iter().find(|s| s.name == name)
    }
}
