pub mod catalog;
pub mod project;
pub mod scaffold;

pub use crate::domain::project::ProjectConfig;
pub use catalog::{load_rule_set, load_table_catalog, save_table_catalog};
pub use project::load_project_config;
pub use scaffold::{GenerateOptions, generate_tables};
