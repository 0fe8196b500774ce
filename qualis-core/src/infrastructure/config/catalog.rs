// qualis-core/src/infrastructure/config/catalog.rs
//
// Table metadata and rule files. Read with serde_yaml, so the historical
// JSON files load unchanged.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;
use validator::Validate;

use crate::domain::rule::RuleSet;
use crate::domain::table::TableCatalog;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, read_config_file};

/// Loads a typed configuration fragment and validates it. Any failure is fatal.
fn load_fragment<T: DeserializeOwned + Validate>(path: &Path) -> Result<T, InfrastructureError> {
    let content = read_config_file(path)?;
    let fragment: T = serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    fragment.validate()?;
    Ok(fragment)
}

pub fn load_table_catalog(path: &Path) -> Result<TableCatalog, InfrastructureError> {
    let catalog: TableCatalog = load_fragment(path)?;
    info!(path = ?path, tables = catalog.len(), "Table metadata loaded");
    Ok(catalog)
}

pub fn load_rule_set(path: &Path) -> Result<RuleSet, InfrastructureError> {
    let rules: RuleSet = load_fragment(path)?;
    info!(path = ?path, rules = rules.len(), "Rule set loaded");
    Ok(rules)
}

/// Pretty JSON, the format of the historical configuration files.
pub fn save_table_catalog(path: &Path, catalog: &TableCatalog) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(catalog)?;
    atomic_write(path, content)
}
