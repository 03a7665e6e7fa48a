//! VM Scale Set model builder — turns instance groups into a task set.
//!
//! For every instance group, in input order, the builder:
//! 1. Maps zones to availability-zone numbers
//! 2. Links the application security group for the group's role
//! 3. Resolves a fixed capacity and the storage profile
//! 4. Attaches the cluster SSH key, user data and the single subnet
//! 5. Adds the API load balancer for control-plane groups
//! 6. Emits role assignments where the group's identity needs them
//!
//! Any error aborts the build; a partial task set is never returned.

use tracing::{debug, info};

use gridform_core::{ClusterConfig, InstanceGroup, InstanceGroupRole};

use crate::capacity::resolve_capacity;
use crate::collaborators::Collaborators;
use crate::context::AzureModelContext;
use crate::error::{ConfigurationError, ModelResult};
use crate::network::resolve_network;
use crate::roles::{build_role_assignments, needs_role_assignments};
use crate::security::{build_security_groups, security_groups_for};
use crate::storage::build_storage_profile;
use crate::tasks::{Lifecycle, TaskSet, VmScaleSet};

pub struct VmScaleSetModelBuilder<'a> {
    context: &'a AzureModelContext,
    collaborators: &'a Collaborators,
    lifecycle: Lifecycle,
}

impl<'a> VmScaleSetModelBuilder<'a> {
    pub fn new(context: &'a AzureModelContext, collaborators: &'a Collaborators) -> Self {
        Self {
            context,
            collaborators,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Lifecycle stamped on every emitted task.
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn build(&self) -> ModelResult<TaskSet> {
        let mut tasks = TaskSet::new();

        for asg in build_security_groups(self.context, self.lifecycle) {
            tasks.add(asg)?;
        }

        for ig in &self.context.instance_groups {
            let name = self.context.autoscaling_group_name(ig);
            let vmss = self.build_scale_set(&mut tasks, name, ig)?;

            let assignments = if needs_role_assignments(&self.context.cluster, ig) {
                build_role_assignments(self.context, &vmss, self.lifecycle)
            } else {
                Vec::new()
            };

            info!(
                scale_set = %vmss.name,
                role = %ig.spec.role,
                capacity = vmss.capacity,
                zones = ?vmss.zones,
                role_assignments = assignments.len(),
                "built scale set"
            );

            tasks.add(vmss)?;
            for assignment in assignments {
                tasks.add(assignment)?;
            }
        }

        info!(
            cluster = %self.context.cluster_name(),
            instance_groups = self.context.instance_groups.len(),
            tasks = tasks.len(),
            "azure model built"
        );
        Ok(tasks)
    }

    fn build_scale_set(
        &self,
        tasks: &mut TaskSet,
        name: String,
        ig: &InstanceGroup,
    ) -> ModelResult<VmScaleSet> {
        let ctx = self.context;
        let c = self.collaborators;

        let zones = ig
            .spec
            .zones
            .iter()
            .map(|zone| c.zones.availability_zone(zone))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let application_security_groups = security_groups_for(ctx, ig.spec.role);
        let capacity = resolve_capacity(ig)?;
        let storage_profile = build_storage_profile(ig, c.volume_sizes.as_ref())?;

        let ssh_public_key = match ctx.ssh_public_keys.as_slice() {
            [] => None,
            [key] => Some(key.clone()),
            keys => {
                return Err(ConfigurationError::TooManySshKeys {
                    group: ig.name.clone(),
                    count: keys.len(),
                }
                .into());
            }
        };

        let user_data = c.bootstrap.user_data(tasks, ig)?;

        let subnets = c.subnets.gather_subnets(&ctx.cluster, ig)?;
        let network = resolve_network(ig, subnets)?;

        let load_balancer = match ig.spec.role {
            InstanceGroupRole::ControlPlane if ctx.cluster.api.load_balancer.is_some() => {
                Some(ctx.link_to_load_balancer())
            }
            _ => None,
        };
        debug!(group = %ig.name, load_balancer = load_balancer.is_some(), "resolved load balancer");

        Ok(VmScaleSet {
            name,
            lifecycle: self.lifecycle,
            resource_group: ctx.link_to_resource_group(),
            virtual_network: ctx.link_to_virtual_network(),
            subnet: ctx.link_to_subnet(&network.subnet),
            application_security_groups,
            sku_name: ig.spec.machine_type.clone(),
            computer_name_prefix: ig.name.clone(),
            admin_user: ctx.cluster.azure.admin_user.clone(),
            capacity,
            storage_profile,
            zones,
            require_public_ip: network.require_public_ip,
            user_data,
            ssh_public_key,
            load_balancer,
            tags: c.tags.tags(&ctx.cluster, ig),
        })
    }
}

/// Build the Azure task set for a cluster file with the default collaborators.
pub fn build_tasks(config: ClusterConfig) -> ModelResult<TaskSet> {
    let context = AzureModelContext::from(config);
    let collaborators = Collaborators::default();
    VmScaleSetModelBuilder::new(&context, &collaborators).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{BootstrapProvider, ZoneMapper};
    use crate::error::ModelError;
    use crate::image::ImageReference;
    use crate::storage::{CachingType, OsDisk};
    use crate::tasks::{TaskKind, TaskLink, UserDataRef};
    use crate::testing::{context, instance_group};
    use gridform_core::{
        ClusterSubnet, LoadBalancerAccessSpec, LoadBalancerType, RootVolumeSpec, SubnetType,
    };

    fn build(ctx: &AzureModelContext) -> ModelResult<TaskSet> {
        VmScaleSetModelBuilder::new(ctx, &Collaborators::default()).build()
    }

    fn public_subnet(ctx: &mut AzureModelContext) {
        ctx.cluster.subnets.push(ClusterSubnet {
            name: "public".to_string(),
            subnet_type: SubnetType::Public,
            id: None,
            cidr: None,
        });
    }

    #[test]
    fn node_group_with_defaults() {
        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let tasks = build(&ctx).unwrap();
        assert_eq!(tasks.security_groups().count(), 2);
        assert_eq!(tasks.role_assignments().count(), 0);

        let vmss = tasks.scale_sets().next().unwrap();
        assert_eq!(vmss.name, "nodes.dev.example.com");
        assert_eq!(vmss.capacity, 2);
        assert!(!vmss.require_public_ip);
        assert_eq!(
            vmss.storage_profile.image_reference,
            ImageReference::ByUrn {
                publisher: "Canonical".to_string(),
                offer: "ubuntu".to_string(),
                sku: "22_04-lts".to_string(),
                version: "latest".to_string(),
            }
        );
        assert_eq!(vmss.storage_profile.os_disk, OsDisk::ephemeral(128));
        assert_eq!(vmss.storage_profile.os_disk.caching, CachingType::ReadOnly);
        assert!(vmss.load_balancer.is_none());
        assert!(vmss.ssh_public_key.is_none());
        assert_eq!(vmss.zones, vec!["1"]);
        assert_eq!(
            vmss.application_security_groups,
            vec![TaskLink::new(TaskKind::ApplicationSecurityGroup, "nodes.dev.example.com")]
        );
        assert_eq!(vmss.user_data, UserDataRef("nodeup-nodes".to_string()));
        assert_eq!(vmss.computer_name_prefix, "nodes");
        assert_eq!(vmss.admin_user, "azureuser");
        assert_eq!(vmss.sku_name, "Standard_D2s_v3");
    }

    #[test]
    fn control_plane_with_resource_id_image_and_load_balancer() {
        let mut ctx = context("dev.example.com");
        public_subnet(&mut ctx);
        ctx.cluster.api.load_balancer = Some(LoadBalancerAccessSpec {
            lb_type: LoadBalancerType::Public,
        });

        let image = "/subscriptions/0000/resourceGroups/images/providers/Microsoft.Compute/images/cp";
        let mut cp = instance_group("control-plane-eastus-1", InstanceGroupRole::ControlPlane);
        cp.spec.image = image.to_string();
        cp.spec.subnets = vec!["public".to_string()];
        cp.spec.associate_public_ip = Some(false);
        ctx.instance_groups.push(cp);

        let tasks = build(&ctx).unwrap();
        let vmss = tasks.scale_sets().next().unwrap();

        assert_eq!(vmss.name, "control-plane-eastus-1.masters.dev.example.com");
        assert_eq!(vmss.capacity, 1);
        assert!(!vmss.require_public_ip);
        assert_eq!(vmss.storage_profile.image_reference, ImageReference::ById(image.to_string()));
        assert_eq!(vmss.storage_profile.os_disk.disk_size_gb, 64);
        assert_eq!(vmss.load_balancer, Some(TaskLink::new(TaskKind::LoadBalancer, "api-dev-example-com")));
        assert_eq!(
            vmss.application_security_groups,
            vec![TaskLink::new(TaskKind::ApplicationSecurityGroup, "control-plane.dev.example.com")]
        );
        assert_eq!(tasks.role_assignments().count(), 2);
    }

    #[test]
    fn public_subnet_exposes_by_default() {
        let mut ctx = context("dev.example.com");
        public_subnet(&mut ctx);
        let mut nodes = instance_group("nodes", InstanceGroupRole::Node);
        nodes.spec.subnets = vec!["public".to_string()];
        ctx.instance_groups.push(nodes);

        let tasks = build(&ctx).unwrap();
        assert!(tasks.scale_sets().next().unwrap().require_public_ip);
    }

    #[test]
    fn node_groups_never_get_load_balancer() {
        let mut ctx = context("dev.example.com");
        ctx.cluster.api.load_balancer = Some(LoadBalancerAccessSpec {
            lb_type: LoadBalancerType::Internal,
        });
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let tasks = build(&ctx).unwrap();
        assert!(tasks.scale_sets().next().unwrap().load_balancer.is_none());
    }

    #[test]
    fn legacy_gossip_gives_nodes_role_assignments() {
        let mut ctx = context("dev.k8s.local");
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let tasks = build(&ctx).unwrap();
        let names: Vec<&str> = tasks.role_assignments().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["nodes.dev.k8s.local-owner", "nodes.dev.k8s.local-blob"]);
    }

    #[test]
    fn task_order_is_stable() {
        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("cp", InstanceGroupRole::ControlPlane));
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let first: Vec<String> = build(&ctx).unwrap().iter().map(|t| t.name().to_string()).collect();
        let second: Vec<String> = build(&ctx).unwrap().iter().map(|t| t.name().to_string()).collect();

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "control-plane.dev.example.com",
                "nodes.dev.example.com",
                "cp.masters.dev.example.com",
                "cp.masters.dev.example.com-owner",
                "cp.masters.dev.example.com-blob",
                "nodes.dev.example.com",
            ]
        );
    }

    #[test]
    fn unset_volume_type_aborts_build() {
        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("cp", InstanceGroupRole::ControlPlane));
        let mut nodes = instance_group("nodes", InstanceGroupRole::Node);
        nodes.spec.root_volume = Some(RootVolumeSpec {
            volume_type: None,
            size: None,
        });
        ctx.instance_groups.push(nodes);

        let err = build(&ctx).unwrap_err();
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("\"nodes\""), "{msg}");
        assert!(msg.contains("unset"), "{msg}");
    }

    #[test]
    fn multiple_ssh_keys_rejected() {
        let mut ctx = context("dev.example.com");
        ctx.ssh_public_keys = vec!["ssh-ed25519 AAAA a".to_string(), "ssh-ed25519 BBBB b".to_string()];
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let err = build(&ctx).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Configuration(ConfigurationError::TooManySshKeys { count: 2, .. })
        ));
    }

    #[test]
    fn single_ssh_key_attached() {
        let mut ctx = context("dev.example.com");
        ctx.ssh_public_keys = vec!["ssh-ed25519 AAAA a".to_string()];
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let tasks = build(&ctx).unwrap();
        assert_eq!(
            tasks.scale_sets().next().unwrap().ssh_public_key.as_deref(),
            Some("ssh-ed25519 AAAA a")
        );
    }

    #[test]
    fn zone_errors_pass_through_unchanged() {
        let mut ctx = context("dev.example.com");
        let mut nodes = instance_group("nodes", InstanceGroupRole::Node);
        nodes.spec.zones = vec!["eastus-1".to_string(), "eastus".to_string()];
        ctx.instance_groups.push(nodes);

        let err = build(&ctx).unwrap_err();
        assert!(matches!(err, ModelError::Collaborator(_)));
        assert_eq!(err.to_string(), "invalid Azure zone: \"eastus\"");
    }

    #[test]
    fn custom_collaborators_are_used() {
        struct FixedZone;
        impl ZoneMapper for FixedZone {
            fn availability_zone(&self, _zone: &str) -> anyhow::Result<String> {
                Ok("3".to_string())
            }
        }

        struct FailingBootstrap;
        impl BootstrapProvider for FailingBootstrap {
            fn user_data(&self, _tasks: &mut TaskSet, ig: &InstanceGroup) -> anyhow::Result<UserDataRef> {
                anyhow::bail!("no nodeup config for {}", ig.name)
            }
        }

        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let zones_only = Collaborators::default().with_zones(FixedZone);
        let tasks = VmScaleSetModelBuilder::new(&ctx, &zones_only).build().unwrap();
        assert_eq!(tasks.scale_sets().next().unwrap().zones, vec!["3"]);

        let failing = Collaborators::default().with_bootstrap(FailingBootstrap);
        let err = VmScaleSetModelBuilder::new(&ctx, &failing).build().unwrap_err();
        assert_eq!(err.to_string(), "no nodeup config for nodes");
    }

    #[test]
    fn duplicate_group_names_rejected() {
        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));
        ctx.instance_groups.push(instance_group("nodes", InstanceGroupRole::Node));

        let err = build(&ctx).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Configuration(ConfigurationError::DuplicateTask { kind: TaskKind::VmScaleSet, .. })
        ));
    }

    #[test]
    fn lifecycle_applies_to_every_task() {
        let mut ctx = context("dev.example.com");
        ctx.instance_groups.push(instance_group("cp", InstanceGroupRole::ControlPlane));
        let collaborators = Collaborators::default();

        let tasks = VmScaleSetModelBuilder::new(&ctx, &collaborators)
            .with_lifecycle(Lifecycle::WarnIfInsufficientAccess)
            .build()
            .unwrap();

        assert!(tasks.security_groups().all(|t| t.lifecycle == Lifecycle::WarnIfInsufficientAccess));
        assert!(tasks.scale_sets().all(|t| t.lifecycle == Lifecycle::WarnIfInsufficientAccess));
        assert!(tasks.role_assignments().all(|t| t.lifecycle == Lifecycle::WarnIfInsufficientAccess));
    }

    #[test]
    fn build_tasks_from_scaffold() {
        let config = ClusterConfig::scaffold("dev.example.com", "eastus");
        let tasks = build_tasks(config).unwrap();
        assert_eq!(tasks.scale_sets().count(), 2);
        assert_eq!(tasks.role_assignments().count(), 2);
        assert_eq!(tasks.len(), 6);
    }
}
