// qualis-core/src/domain/project.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::diagnostic::MagnitudeRules;

/// `qualis.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[validate(length(min = 1, message = "tables-path cannot be empty"))]
    #[serde(rename = "tables-path", default = "default_tables_path")]
    pub tables_path: String,

    #[validate(length(min = 1, message = "rules-path cannot be empty"))]
    #[serde(rename = "rules-path", default = "default_rules_path")]
    pub rules_path: String,

    #[validate(length(min = 1, message = "output-path cannot be empty"))]
    #[serde(rename = "output-path", default = "default_output_path")]
    pub output_path: String,

    #[validate(range(min = 1, max = 64, message = "concurrency must be between 1 and 64"))]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub magnitude_rules: MagnitudeRules,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            tables_path: default_tables_path(),
            rules_path: default_rules_path(),
            output_path: default_output_path(),
            concurrency: default_concurrency(),
            magnitude_rules: MagnitudeRules::default(),
        }
    }
}

fn default_name() -> String {
    "qualis".to_string()
}
fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_tables_path() -> String {
    "config/eda_tabelas.json".to_string()
}
fn default_rules_path() -> String {
    "config/eda_analises.json".to_string()
}
fn default_output_path() -> String {
    "relatorio_eda_final.json".to_string()
}
fn default_concurrency() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let config: ProjectConfig = serde_yaml::from_str(
            "name: risco\noutput-path: out/report.json\nmagnitude_rules:\n  score:\n    min_aceitavel: 300\n    mensagem: Score abaixo do piso\n",
        )?;
        config.validate()?;
        assert_eq!(config.name, "risco");
        assert_eq!(config.tables_path, "config/eda_tabelas.json");
        assert_eq!(config.output_path, "out/report.json");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.magnitude_rules.len(), 1);
        assert!(config.magnitude_rules.get("idade").is_none());
        Ok(())
    }

    #[test]
    fn test_concurrency_is_bounded() -> Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("concurrency: 0")?;
        assert!(config.validate().is_err());
        assert_eq!(ProjectConfig::default().magnitude_rules.len(), 2);
        Ok(())
    }
}
