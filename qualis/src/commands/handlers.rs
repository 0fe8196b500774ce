// qualis/src/commands/handlers.rs
//
// USE CASE: List the handler catalog.

use std::path::PathBuf;

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use qualis_core::application::HandlerCatalog;
use qualis_core::infrastructure::config::load_project_config;

pub fn execute(project_dir: PathBuf, json: bool) -> anyhow::Result<()> {
    // Magnitude rules come from the project file, when there is one.
    let config = load_project_config(&project_dir)?;
    let entries = HandlerCatalog::builtin(config.magnitude_rules).entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Módulo", "Função", "Tipo"]);
    for entry in &entries {
        table.add_row(vec![
            entry.namespace.as_str(),
            entry.name.as_str(),
            entry.capability,
        ]);
    }
    println!("{table}");
    Ok(())
}
