use std::fmt::Write as _;
use std::path::Path;

use gridform_azure::{AzureModelContext, Collaborators, Lifecycle, Task, TaskSet, VmScaleSetModelBuilder};
use gridform_core::ClusterConfig;

pub fn build(config: &str, format: &str, lifecycle: Lifecycle) -> anyhow::Result<()> {
    let tasks = compile(Path::new(config), lifecycle)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        _ => {
            print!("{}", format_tasks(&tasks));
        }
    }

    Ok(())
}

fn compile(path: &Path, lifecycle: Lifecycle) -> anyhow::Result<TaskSet> {
    let config = ClusterConfig::from_file(path)?;
    tracing::info!(
        cluster = %config.cluster.name,
        instance_groups = config.instance_groups.len(),
        "Loaded cluster file"
    );

    let context = AzureModelContext::from(config);
    let collaborators = Collaborators::default();
    let tasks = VmScaleSetModelBuilder::new(&context, &collaborators)
        .with_lifecycle(lifecycle)
        .build()?;
    Ok(tasks)
}

/// One line per task, scale sets with their resolved shape.
pub fn format_tasks(tasks: &TaskSet) -> String {
    let mut out = String::new();
    for task in tasks.iter() {
        let _ = match task {
            Task::VmScaleSet(v) => writeln!(
                out,
                "{:<26} {}  sku={} capacity={} zones=[{}] public_ip={} disk={}GiB",
                task.kind().to_string(),
                v.name,
                v.sku_name,
                v.capacity,
                v.zones.join(","),
                v.require_public_ip,
                v.storage_profile.os_disk.disk_size_gb,
            ),
            Task::RoleAssignment(r) => writeln!(
                out,
                "{:<26} {}  role={}",
                task.kind().to_string(),
                r.name,
                r.role_def_id,
            ),
            Task::ApplicationSecurityGroup(a) => {
                writeln!(out, "{:<26} {}", task.kind().to_string(), a.name)
            }
        };
    }
    let _ = writeln!(out, "{} tasks", tasks.len());
    out
}
