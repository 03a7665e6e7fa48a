//! Built-in role assignments for scale set identities.
//!
//! See <https://learn.microsoft.com/en-us/azure/role-based-access-control/built-in-roles>
//! for the role definition ids.

use gridform_core::{Cluster, InstanceGroup};
use tracing::debug;

use crate::context::AzureModelContext;
use crate::tasks::{Lifecycle, RoleAssignment, VmScaleSet};

/// (name suffix, role definition id), in emission order.
pub const ROLE_DEFINITIONS: &[(&str, &str)] = &[
    // Owner
    ("owner", "8e3af657-a8ff-443c-a75c-2fe8c4bcb635"),
    // Storage Blob Data Contributor
    ("blob", "ba92f5b4-2d11-453d-a403-e96b0029c9fe"),
];

/// Control-plane groups always need the bindings. Under legacy gossip every
/// node reads cluster state from blob storage, so node groups do too.
pub fn needs_role_assignments(cluster: &Cluster, ig: &InstanceGroup) -> bool {
    ig.is_control_plane() || cluster.uses_legacy_gossip()
}

pub fn build_role_assignments(
    ctx: &AzureModelContext,
    vmss: &VmScaleSet,
    lifecycle: Lifecycle,
) -> Vec<RoleAssignment> {
    ROLE_DEFINITIONS
        .iter()
        .map(|(key, role_def_id)| {
            debug!(scale_set = %vmss.name, role = *key, "adding role assignment");
            RoleAssignment {
                name: format!("{}-{}", vmss.name, key),
                lifecycle,
                resource_group: ctx.link_to_resource_group(),
                vm_scale_set: vmss.link(),
                role_def_id: role_def_id.to_string(),
            }
        })
        .collect()
}
