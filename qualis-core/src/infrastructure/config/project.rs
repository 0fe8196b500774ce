// qualis-core/src/infrastructure/config/project.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_config_file;

const CANDIDATES: [&str; 2] = ["qualis.yaml", "qualis.yml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Optional project file
    let mut config = match find_main_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading project configuration");
            let content = read_config_file(&path)?;
            serde_yaml::from_str(&content)?
        }
        None => {
            info!(dir = ?project_dir, "No qualis.yaml found, using defaults");
            ProjectConfig::default()
        }
    };

    // 2. Layering: QUALIS_OUTPUT_PATH=/tmp/r.json qualis run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config.validate()?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides(
    config: &mut ProjectConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = lookup("QUALIS_OUTPUT_PATH") {
        info!(old = ?config.output_path, new = ?val, "Overriding output path via ENV");
        config.output_path = val;
    }
    if let Some(val) = lookup("QUALIS_CONCURRENCY") {
        let parsed = val.trim().parse::<usize>().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "QUALIS_CONCURRENCY must be a positive integer, got '{}'",
                val
            ))
        })?;
        info!(old = config.concurrency, new = parsed, "Overriding concurrency via ENV");
        config.concurrency = parsed;
    }
    Ok(())
}
