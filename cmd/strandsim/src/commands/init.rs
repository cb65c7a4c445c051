//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use strand_sweep::SweepConfig;
use tracing::info;

/// Runs the init command.
pub fn run(path: &str) -> Result<()> {
    let project_path = Path::new(path);

    info!("Initializing strandsim project at: {}", project_path.display());

    fs::create_dir_all(project_path)
        .with_context(|| format!("Failed to create directory: {}", project_path.display()))?;

    let config_path = project_path.join("sweep.yaml");
    if config_path.exists() {
        info!("Skipped: {} (already exists)", config_path.display());
        return Ok(());
    }

    let yaml = SweepConfig::default()
        .to_yaml()
        .with_context(|| "Failed to serialize default sweep config")?;
    let content = format!("# strandsim sweep grid: M = c * strands for every (c, R) pair\n{yaml}");
    fs::write(&config_path, content).with_context(|| "Failed to create sweep.yaml")?;
    info!("Created: {}", config_path.display());

    info!("Run `strandsim sweep --config sweep.yaml` to start");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        run(path).unwrap();
        let config_path = dir.path().join("sweep.yaml");
        let config = SweepConfig::load(&config_path).unwrap();
        assert_eq!(config.scaling_factors, vec![3, 10, 25, 50]);

        fs::write(&config_path, "strands: 10\n").unwrap();
        run(path).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "strands: 10\n");
    }
}
