// qualis/src/commands/mod.rs

pub mod generate;
pub mod handlers;
pub mod run;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use qualis_core::application::HandlerCatalog;
use qualis_core::domain::project::ProjectConfig;
use qualis_core::domain::rule::RuleSet;
use qualis_core::domain::table::TableCatalog;
use qualis_core::infrastructure::config::{load_project_config, load_rule_set, load_table_catalog};

/// Everything a run needs before any dataset is read.
pub struct Project {
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub tables: TableCatalog,
    pub rules: RuleSet,
}

impl Project {
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;

        let tables_path = project_dir.join(&config.tables_path);
        let tables = load_table_catalog(&tables_path)
            .with_context(|| format!("Failed to load table metadata from {:?}", tables_path))?;

        let rules_path = project_dir.join(&config.rules_path);
        let rules = load_rule_set(&rules_path)
            .with_context(|| format!("Failed to load rules from {:?}", rules_path))?;

        Ok(Self {
            dir: project_dir.to_path_buf(),
            config,
            tables,
            rules,
        })
    }

    pub fn catalog(&self) -> HandlerCatalog {
        HandlerCatalog::builtin(self.config.magnitude_rules.clone())
    }
}
