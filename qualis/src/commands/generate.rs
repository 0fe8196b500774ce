// qualis/src/commands/generate.rs
//
// USE CASE: Scan a data directory and update the table metadata file.

use std::path::PathBuf;

use qualis_core::domain::ports::DatasetLoader;
use qualis_core::domain::table::TableCatalog;
use qualis_core::infrastructure::FileDatasetLoader;
use qualis_core::infrastructure::config::{
    GenerateOptions, generate_tables, load_project_config, load_table_catalog, save_table_catalog,
};
use qualis_core::infrastructure::error::InfrastructureError;

pub fn execute(
    project_dir: PathBuf,
    data_dir: String,
    prune: bool,
    infer_roles: bool,
) -> anyhow::Result<()> {
    println!(
        "🕵️‍♀️  Scanning for tables in '{}/{}'...",
        project_dir.display(),
        data_dir
    );

    let config = load_project_config(&project_dir)?;
    let tables_path = project_dir.join(&config.tables_path);

    let existing = match load_table_catalog(&tables_path) {
        Ok(catalog) => catalog,
        Err(InfrastructureError::ConfigNotFound(_)) => TableCatalog::default(),
        Err(e) => return Err(e.into()),
    };

    let loader = FileDatasetLoader::new();
    let inference: Option<&dyn DatasetLoader> = infer_roles.then_some(&loader);
    let options = GenerateOptions {
        prune,
        infer_roles: inference,
    };

    let catalog = generate_tables(&project_dir, &data_dir, &existing, options)?;
    println!("📝 Found {} tables.", catalog.len());

    save_table_catalog(&tables_path, &catalog)?;
    println!("✨ {} updated successfully!", tables_path.display());
    Ok(())
}
