use std::path::Path;

use anyhow::bail;
use gridform_core::ClusterConfig;

pub fn init(name: &str, region: &str, output: &str) -> anyhow::Result<()> {
    let path = Path::new(output);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let config = ClusterConfig::scaffold(name, region);
    std::fs::write(path, config.to_toml_string()?)?;
    println!("✓ Generated {}", path.display());
    Ok(())
}
