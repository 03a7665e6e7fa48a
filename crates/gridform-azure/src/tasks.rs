//! Task descriptors handed to the reconciliation engine.
//!
//! Tasks reference each other by [`TaskLink`] (kind + name) rather than by
//! containment; the engine resolves links against its own task graph and
//! uses them as dependency edges. A task's name is its idempotency key.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::storage::StorageProfile;

/// How the engine treats a task when reconciling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Create or update to match.
    #[default]
    Sync,
    /// Like `Sync`, but downgrade permission failures to warnings.
    WarnIfInsufficientAccess,
    /// Must already exist and match; never modified.
    ExistsAndValidates,
    /// Must already exist; differences are only reported.
    ExistsAndWarnIfChanges,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    ResourceGroup,
    VirtualNetwork,
    Subnet,
    LoadBalancer,
    ApplicationSecurityGroup,
    VmScaleSet,
    RoleAssignment,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskKind::ResourceGroup => "ResourceGroup",
            TaskKind::VirtualNetwork => "VirtualNetwork",
            TaskKind::Subnet => "Subnet",
            TaskKind::LoadBalancer => "LoadBalancer",
            TaskKind::ApplicationSecurityGroup => "ApplicationSecurityGroup",
            TaskKind::VmScaleSet => "VMScaleSet",
            TaskKind::RoleAssignment => "RoleAssignment",
        };
        f.write_str(s)
    }
}

/// A by-name reference to another task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskLink {
    pub kind: TaskKind,
    pub name: String,
}

impl TaskLink {
    pub fn new(kind: TaskKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Opaque handle to node bootstrap content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDataRef(pub String);

// ── Task descriptors ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSecurityGroup {
    pub name: String,
    pub lifecycle: Lifecycle,
    pub resource_group: TaskLink,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmScaleSet {
    pub name: String,
    pub lifecycle: Lifecycle,
    pub resource_group: TaskLink,
    pub virtual_network: TaskLink,
    pub subnet: TaskLink,
    pub application_security_groups: Vec<TaskLink>,
    pub sku_name: String,
    pub computer_name_prefix: String,
    pub admin_user: String,
    /// Fixed instance count; the scale set is not elastic.
    pub capacity: u32,
    pub storage_profile: StorageProfile,
    /// Availability-zone numbers, in instance-group zone order.
    pub zones: Vec<String>,
    pub require_public_ip: bool,
    pub user_data: UserDataRef,
    pub ssh_public_key: Option<String>,
    pub load_balancer: Option<TaskLink>,
    pub tags: BTreeMap<String, String>,
}

impl VmScaleSet {
    pub fn link(&self) -> TaskLink {
        TaskLink::new(TaskKind::VmScaleSet, &self.name)
    }
}

/// Grants a built-in role to a scale set's managed identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub name: String,
    pub lifecycle: Lifecycle,
    /// Scope of the assignment.
    pub resource_group: TaskLink,
    /// Principal receiving the role.
    pub vm_scale_set: TaskLink,
    pub role_def_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Task {
    ApplicationSecurityGroup(ApplicationSecurityGroup),
    #[serde(rename = "VMScaleSet")]
    VmScaleSet(VmScaleSet),
    RoleAssignment(RoleAssignment),
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::ApplicationSecurityGroup(_) => TaskKind::ApplicationSecurityGroup,
            Task::VmScaleSet(_) => TaskKind::VmScaleSet,
            Task::RoleAssignment(_) => TaskKind::RoleAssignment,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Task::ApplicationSecurityGroup(t) => &t.name,
            Task::VmScaleSet(t) => &t.name,
            Task::RoleAssignment(t) => &t.name,
        }
    }
}

impl From<ApplicationSecurityGroup> for Task {
    fn from(t: ApplicationSecurityGroup) -> Self {
        Task::ApplicationSecurityGroup(t)
    }
}

impl From<VmScaleSet> for Task {
    fn from(t: VmScaleSet) -> Self {
        Task::VmScaleSet(t)
    }
}

impl From<RoleAssignment> for Task {
    fn from(t: RoleAssignment) -> Self {
        Task::RoleAssignment(t)
    }
}

// ── Task set ──────────────────────────────────────────────────────

/// Tasks in insertion order, unique by (kind, name).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskSet {
    tasks: Vec<Task>,
    #[serde(skip)]
    keys: HashSet<(TaskKind, String)>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, task: impl Into<Task>) -> Result<(), ConfigurationError> {
        let task = task.into();
        let key = (task.kind(), task.name().to_string());
        if !self.keys.insert(key) {
            return Err(ConfigurationError::DuplicateTask {
                kind: task.kind(),
                name: task.name().to_string(),
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn get(&self, kind: TaskKind, name: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.kind() == kind && t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn scale_sets(&self) -> impl Iterator<Item = &VmScaleSet> {
        self.tasks.iter().filter_map(|t| match t {
            Task::VmScaleSet(v) => Some(v),
            _ => None,
        })
    }

    pub fn role_assignments(&self) -> impl Iterator<Item = &RoleAssignment> {
        self.tasks.iter().filter_map(|t| match t {
            Task::RoleAssignment(r) => Some(r),
            _ => None,
        })
    }

    pub fn security_groups(&self) -> impl Iterator<Item = &ApplicationSecurityGroup> {
        self.tasks.iter().filter_map(|t| match t {
            Task::ApplicationSecurityGroup(a) => Some(a),
            _ => None,
        })
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }
}
