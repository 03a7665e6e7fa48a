//! Cluster file parser.
//!
//! A cluster file is TOML holding one `[cluster]` table, the cluster-wide SSH
//! keys and any number of `[[instance_group]]` tables.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    #[serde(default)]
    pub ssh_public_keys: Vec<String>,
    pub cluster: Cluster,
    #[serde(default, rename = "instance_group")]
    pub instance_groups: Vec<InstanceGroup>,
}

impl ClusterConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a single-zone cluster with one control-plane group and one
    /// node group, both on ephemeral OS disks in a private subnet.
    pub fn scaffold(cluster_name: &str, region: &str) -> Self {
        let zone = format!("{region}-1");
        let group = |name: &str, role: InstanceGroupRole, machine_type: &str| InstanceGroup {
            name: name.to_string(),
            spec: InstanceGroupSpec {
                role,
                zones: vec![zone.clone()],
                machine_type: machine_type.to_string(),
                min_size: None,
                max_size: None,
                image: "Canonical:0001-com-ubuntu-server-jammy:22_04-lts-gen2:latest".to_string(),
                subnets: vec![region.to_string()],
                associate_public_ip: None,
                root_volume: Some(RootVolumeSpec {
                    volume_type: Some(RootVolumeType::EphemeralOnOSCache),
                    size: None,
                }),
                cloud_labels: BTreeMap::new(),
            },
        };

        ClusterConfig {
            ssh_public_keys: Vec::new(),
            cluster: Cluster {
                name: cluster_name.to_string(),
                dns: DnsType::default(),
                azure: AzureSpec::default(),
                api: ApiSpec {
                    load_balancer: Some(LoadBalancerAccessSpec {
                        lb_type: LoadBalancerType::Public,
                    }),
                },
                subnets: vec![ClusterSubnet {
                    name: region.to_string(),
                    subnet_type: SubnetType::Private,
                    id: None,
                    cidr: Some("10.0.0.0/16".to_string()),
                }],
                cloud_labels: BTreeMap::new(),
            },
            instance_groups: vec![
                group(format!("control-plane-{zone}").as_str(), InstanceGroupRole::ControlPlane, "Standard_D4s_v3"),
                group(format!("nodes-{zone}").as_str(), InstanceGroupRole::Node, "Standard_D8s_v3"),
            ],
        }
    }
}
