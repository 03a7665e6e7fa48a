//! Fixtures shared by the unit tests.

use std::collections::BTreeMap;

use gridform_core::*;

use crate::context::AzureModelContext;
use crate::image::ImageReference;
use crate::storage::{OsDisk, StorageProfile};
use crate::tasks::{Lifecycle, TaskKind, TaskLink, UserDataRef, VmScaleSet};

/// A cluster with a single private subnet named `eastus`.
pub fn cluster(name: &str) -> Cluster {
    Cluster {
        name: name.to_string(),
        dns: DnsType::Public,
        azure: AzureSpec::default(),
        api: ApiSpec::default(),
        subnets: vec![ClusterSubnet {
            name: "eastus".to_string(),
            subnet_type: SubnetType::Private,
            id: None,
            cidr: Some("10.0.0.0/16".to_string()),
        }],
        cloud_labels: BTreeMap::new(),
    }
}

pub fn context(cluster_name: &str) -> AzureModelContext {
    AzureModelContext {
        cluster: cluster(cluster_name),
        instance_groups: Vec::new(),
        ssh_public_keys: Vec::new(),
    }
}

/// A group in `eastus-1` on an ephemeral OS disk with no explicit size.
pub fn instance_group(name: &str, role: InstanceGroupRole) -> InstanceGroup {
    InstanceGroup {
        name: name.to_string(),
        spec: InstanceGroupSpec {
            role,
            zones: vec!["eastus-1".to_string()],
            machine_type: "Standard_D2s_v3".to_string(),
            min_size: None,
            max_size: None,
            image: "Canonical:ubuntu:22_04-lts:latest".to_string(),
            subnets: vec!["eastus".to_string()],
            associate_public_ip: None,
            root_volume: Some(RootVolumeSpec {
                volume_type: Some(RootVolumeType::EphemeralOnOSCache),
                size: None,
            }),
            cloud_labels: BTreeMap::new(),
        },
    }
}

pub fn scale_set(name: &str) -> VmScaleSet {
    VmScaleSet {
        name: name.to_string(),
        lifecycle: Lifecycle::Sync,
        resource_group: TaskLink::new(TaskKind::ResourceGroup, "rg"),
        virtual_network: TaskLink::new(TaskKind::VirtualNetwork, "vnet"),
        subnet: TaskLink::new(TaskKind::Subnet, "eastus"),
        application_security_groups: Vec::new(),
        sku_name: "Standard_D2s_v3".to_string(),
        computer_name_prefix: name.to_string(),
        admin_user: "azureuser".to_string(),
        capacity: 1,
        storage_profile: StorageProfile {
            image_reference: ImageReference::ById("/subscriptions/0000/images/test".to_string()),
            os_disk: OsDisk::ephemeral(64),
        },
        zones: vec!["1".to_string()],
        require_public_ip: false,
        user_data: UserDataRef(format!("nodeup-{name}")),
        ssh_public_key: None,
        load_balancer: None,
        tags: BTreeMap::new(),
    }
}
