use clap::{Parser, Subcommand, ValueEnum};

use gridform_azure::Lifecycle;

mod commands;

#[derive(Parser)]
#[command(
    name = "gridform",
    about = "gridform — compile cluster definitions into cloud provider tasks",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a cluster file into Azure tasks
    Build {
        /// Path to the cluster file
        #[arg(short, long, default_value = "cluster.toml")]
        config: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Lifecycle stamped on every task
        #[arg(short, long, value_enum, default_value_t = LifecycleArg::Sync)]
        lifecycle: LifecycleArg,
    },
    /// Write a starter cluster file
    Init {
        /// Cluster name; names ending in .k8s.local use gossip
        #[arg(short, long)]
        name: String,
        /// Azure region, e.g. eastus
        #[arg(short, long, default_value = "eastus")]
        region: String,
        /// Where to write the cluster file
        #[arg(short, long, default_value = "cluster.toml")]
        output: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LifecycleArg {
    Sync,
    WarnIfInsufficientAccess,
    ExistsAndValidates,
    ExistsAndWarnIfChanges,
    Ignore,
}

impl From<LifecycleArg> for Lifecycle {
    fn from(arg: LifecycleArg) -> Self {
        match arg {
            LifecycleArg::Sync => Lifecycle::Sync,
            LifecycleArg::WarnIfInsufficientAccess => Lifecycle::WarnIfInsufficientAccess,
            LifecycleArg::ExistsAndValidates => Lifecycle::ExistsAndValidates,
            LifecycleArg::ExistsAndWarnIfChanges => Lifecycle::ExistsAndWarnIfChanges,
            LifecycleArg::Ignore => Lifecycle::Ignore,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridform=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { config, format, lifecycle } => {
            commands::build::build(&config, &format, lifecycle.into())
        }
        Commands::Init { name, region, output } => {
            commands::init::init(&name, &region, &output)
        }
    }
}
