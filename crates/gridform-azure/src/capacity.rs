//! Scale set capacity.
//!
//! Azure scale sets are modelled here as fixed-size: the resolved min and max
//! must agree, and that value is the capacity.

use gridform_core::{InstanceGroup, InstanceGroupRole};
use tracing::debug;

use crate::error::ConfigurationError;

/// Size used for unset bounds on groups other than nodes.
pub const DEFAULT_GROUP_SIZE: u32 = 1;

/// Size used for unset bounds on node groups.
pub const DEFAULT_NODE_GROUP_SIZE: u32 = 2;

fn default_size(role: InstanceGroupRole) -> u32 {
    match role {
        InstanceGroupRole::Node => DEFAULT_NODE_GROUP_SIZE,
        InstanceGroupRole::ControlPlane => DEFAULT_GROUP_SIZE,
    }
}

pub fn resolve_capacity(ig: &InstanceGroup) -> Result<u32, ConfigurationError> {
    let fallback = default_size(ig.spec.role);
    let min = ig.spec.min_size.unwrap_or(fallback);
    let max = ig.spec.max_size.unwrap_or(fallback);

    if min != max {
        return Err(ConfigurationError::CapacityMismatch {
            group: ig.name.clone(),
            min,
            max,
        });
    }

    debug!(group = %ig.name, capacity = min, "resolved capacity");
    Ok(min)
}
