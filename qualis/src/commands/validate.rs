// qualis/src/commands/validate.rs
//
// USE CASE: Pre-flight check of the configuration. No dataset is read.

use std::path::{Path, PathBuf};

use qualis_core::application::HandlerRegistry;

use super::Project;

pub fn execute(project_dir: PathBuf, strict: bool) -> anyhow::Result<()> {
    println!("🔎 Validating configuration...");
    let project = Project::load(&project_dir)?;

    let (registry, problems) = HandlerRegistry::build(&project.catalog(), &project.rules);
    println!(
        "   {} tables, {} rules ({} analysis / {} diagnostic handlers bound)",
        project.tables.len(),
        project.rules.len(),
        registry.analysis_count(),
        registry.diagnostic_count()
    );

    let mut warnings = 0;
    for problem in &problems {
        println!("   ⚠️  {}", problem);
        warnings += 1;
    }

    for table in project.tables.tables() {
        let raw = Path::new(&table.caminho_arquivo);
        let path = if raw.is_relative() {
            project.dir.join(raw)
        } else {
            raw.to_path_buf()
        };
        if !path.is_file() {
            println!(
                "   ⚠️  Table '{}': file {:?} not found (will be skipped)",
                table.nome_tabela, path
            );
            warnings += 1;
        }
    }

    if warnings == 0 {
        println!("✨ Configuration is valid.");
        return Ok(());
    }
    if strict {
        anyhow::bail!("{} warning(s) found in strict mode", warnings);
    }
    println!("✅ Configuration loaded with {} warning(s).", warnings);
    Ok(())
}
