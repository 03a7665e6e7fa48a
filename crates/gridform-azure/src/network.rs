//! Subnet placement and public-IP policy.

use gridform_core::{ClusterSubnet, InstanceGroup, SubnetType};
use tracing::debug;

use crate::error::ConfigurationError;

/// Where a scale set's NICs attach and whether they get public IPs.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkBinding {
    pub subnet: ClusterSubnet,
    pub require_public_ip: bool,
}

/// Public and utility subnets expose instances unless the group says
/// otherwise; dual-stack and private subnets never do.
pub fn public_ip_policy(subnet_type: SubnetType, associate_public_ip: Option<bool>) -> bool {
    match subnet_type {
        SubnetType::Public | SubnetType::Utility => associate_public_ip.unwrap_or(true),
        SubnetType::DualStack | SubnetType::Private => false,
    }
}

/// Pick the group's only subnet and derive its exposure.
pub fn resolve_network(
    ig: &InstanceGroup,
    subnets: Vec<ClusterSubnet>,
) -> Result<NetworkBinding, ConfigurationError> {
    let subnet = match <[ClusterSubnet; 1]>::try_from(subnets) {
        Ok([subnet]) => subnet,
        Err(subnets) => {
            return Err(ConfigurationError::SubnetCount {
                group: ig.name.clone(),
                found: subnets.len(),
                subnets: ig.spec.subnets.clone(),
            });
        }
    };

    let require_public_ip = public_ip_policy(subnet.subnet_type, ig.spec.associate_public_ip);
    debug!(
        group = %ig.name,
        subnet = %subnet.name,
        tier = %subnet.subnet_type,
        require_public_ip,
        "resolved network binding"
    );

    Ok(NetworkBinding {
        subnet,
        require_public_ip,
    })
}
