//! Cluster-wide naming and links shared by the Azure model builders.

use gridform_core::{Cluster, ClusterConfig, ClusterSubnet, InstanceGroup, InstanceGroupRole};

use crate::tasks::{TaskKind, TaskLink};

/// Everything a build reads about the cluster. Immutable for the build.
#[derive(Debug, Clone)]
pub struct AzureModelContext {
    pub cluster: Cluster,
    pub instance_groups: Vec<InstanceGroup>,
    pub ssh_public_keys: Vec<String>,
}

impl From<ClusterConfig> for AzureModelContext {
    fn from(config: ClusterConfig) -> Self {
        Self {
            cluster: config.cluster,
            instance_groups: config.instance_groups,
            ssh_public_keys: config.ssh_public_keys,
        }
    }
}

impl AzureModelContext {
    pub fn cluster_name(&self) -> &str {
        &self.cluster.name
    }

    /// Scale set name, unique per cluster.
    ///
    /// Control-plane groups keep the `.masters.` infix so existing scale sets
    /// are matched across upgrades.
    pub fn autoscaling_group_name(&self, ig: &InstanceGroup) -> String {
        match ig.spec.role {
            InstanceGroupRole::ControlPlane => format!("{}.masters.{}", ig.name, self.cluster_name()),
            InstanceGroupRole::Node => format!("{}.{}", ig.name, self.cluster_name()),
        }
    }

    pub fn resource_group_name(&self) -> &str {
        self.cluster
            .azure
            .resource_group_name
            .as_deref()
            .unwrap_or(&self.cluster.name)
    }

    pub fn virtual_network_name(&self) -> &str {
        self.cluster
            .azure
            .virtual_network_name
            .as_deref()
            .unwrap_or(&self.cluster.name)
    }

    pub fn name_for_application_security_group(&self, role: InstanceGroupRole) -> String {
        match role {
            InstanceGroupRole::ControlPlane => format!("control-plane.{}", self.cluster_name()),
            InstanceGroupRole::Node => format!("nodes.{}", self.cluster_name()),
        }
    }

    /// Load balancer names cannot contain dots.
    pub fn name_for_load_balancer(&self) -> String {
        format!("api-{}", self.cluster_name().replace('.', "-"))
    }

    pub fn link_to_resource_group(&self) -> TaskLink {
        TaskLink::new(TaskKind::ResourceGroup, self.resource_group_name())
    }

    pub fn link_to_virtual_network(&self) -> TaskLink {
        TaskLink::new(TaskKind::VirtualNetwork, self.virtual_network_name())
    }

    /// Pre-existing subnets are referenced by provider id.
    pub fn link_to_subnet(&self, subnet: &ClusterSubnet) -> TaskLink {
        TaskLink::new(TaskKind::Subnet, subnet.id.as_deref().unwrap_or(&subnet.name))
    }

    pub fn link_to_application_security_group(&self, role: InstanceGroupRole) -> TaskLink {
        TaskLink::new(
            TaskKind::ApplicationSecurityGroup,
            self.name_for_application_security_group(role),
        )
    }

    pub fn link_to_load_balancer(&self) -> TaskLink {
        TaskLink::new(TaskKind::LoadBalancer, self.name_for_load_balancer())
    }
}
