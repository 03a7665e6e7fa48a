//! Storage profile for scale set VMs: image plus OS disk.

use gridform_core::{InstanceGroup, RootVolumeType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collaborators::VolumeSizeDefaulter;
use crate::error::{ConfigurationError, ModelResult};
use crate::image::ImageReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsType {
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskCreateOption {
    FromImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachingType {
    None,
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffDiskOption {
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffDiskPlacement {
    CacheDisk,
    ResourceDisk,
}

/// Ephemeral ("diff disk") settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffDiskSettings {
    pub option: DiffDiskOption,
    pub placement: DiffDiskPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsDisk {
    pub os_type: OsType,
    pub create_option: DiskCreateOption,
    pub disk_size_gb: u32,
    pub caching: CachingType,
    pub diff_disk_settings: Option<DiffDiskSettings>,
}

impl OsDisk {
    /// An OS disk created from the image on the VM's cache disk.
    ///
    /// Ephemeral disks only allow read-only caching.
    pub fn ephemeral(disk_size_gb: u32) -> Self {
        Self {
            os_type: OsType::Linux,
            create_option: DiskCreateOption::FromImage,
            disk_size_gb,
            caching: CachingType::ReadOnly,
            diff_disk_settings: Some(DiffDiskSettings {
                option: DiffDiskOption::Local,
                placement: DiffDiskPlacement::CacheDisk,
            }),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.diff_disk_settings.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProfile {
    pub image_reference: ImageReference,
    pub os_disk: OsDisk,
}

/// Build the storage profile for an instance group.
///
/// Only [`RootVolumeType::EphemeralOnOSCache`] maps onto a scale set OS disk
/// today; every other type, including an unset one, is rejected.
pub fn build_storage_profile(
    ig: &InstanceGroup,
    volume_sizes: &dyn VolumeSizeDefaulter,
) -> ModelResult<StorageProfile> {
    let root_volume = ig.spec.root_volume.as_ref();

    let disk_size_gb = match root_volume.and_then(|rv| rv.size) {
        Some(size) => size,
        None => volume_sizes.default_volume_size(ig.spec.role)?,
    };

    let image_reference =
        ImageReference::parse(&ig.spec.image).map_err(|_| ConfigurationError::MalformedImage {
            group: ig.name.clone(),
            image: ig.spec.image.clone(),
        })?;

    match root_volume.and_then(|rv| rv.volume_type) {
        Some(RootVolumeType::EphemeralOnOSCache) => {
            debug!(group = %ig.name, disk_size_gb, image = %image_reference, "built ephemeral storage profile");
            Ok(StorageProfile {
                image_reference,
                os_disk: OsDisk::ephemeral(disk_size_gb),
            })
        }
        other => Err(ConfigurationError::UnsupportedVolumeType {
            group: ig.name.clone(),
            volume_type: other.map_or_else(|| "unset".to_string(), |t| t.to_string()),
        }
        .into()),
    }
}
