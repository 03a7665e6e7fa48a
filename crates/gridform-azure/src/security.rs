//! Cluster-scoped application security groups.
//!
//! One group per role, created once per build. Each scale set joins only the
//! group for its own role.

use std::collections::BTreeMap;

use gridform_core::InstanceGroupRole;

use crate::context::AzureModelContext;
use crate::tasks::{ApplicationSecurityGroup, Lifecycle, TaskLink};

pub const SECURITY_GROUP_ROLES: [InstanceGroupRole; 2] =
    [InstanceGroupRole::ControlPlane, InstanceGroupRole::Node];

pub fn build_security_groups(
    ctx: &AzureModelContext,
    lifecycle: Lifecycle,
) -> Vec<ApplicationSecurityGroup> {
    SECURITY_GROUP_ROLES
        .into_iter()
        .map(|role| ApplicationSecurityGroup {
            name: ctx.name_for_application_security_group(role),
            lifecycle,
            resource_group: ctx.link_to_resource_group(),
            tags: BTreeMap::new(),
        })
        .collect()
}

pub fn security_groups_for(ctx: &AzureModelContext, role: InstanceGroupRole) -> Vec<TaskLink> {
    vec![ctx.link_to_application_security_group(role)]
}
