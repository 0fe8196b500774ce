// qualis-core/src/infrastructure/config/scaffold.rs
//
// `qualis generate`: scan a data directory and merge what is found into the
// table metadata file.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::domain::ports::DatasetLoader;
use crate::domain::rule::OneOrMany;
use crate::domain::table::{TableCatalog, TableMetadata};
use crate::infrastructure::error::InfrastructureError;

pub const NUMERIC_ROLE: &str = "colunas_numericas";

pub struct GenerateOptions<'a> {
    /// Drop existing entries whose file disappeared.
    pub prune: bool,
    /// When set, each new file is loaded and its numeric columns become `colunas_numericas`.
    pub infer_roles: Option<&'a dyn DatasetLoader>,
}

fn format_tag(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("csv"),
        "xlsx" | "xls" | "xlsm" => Some("excel"),
        _ => None,
    }
}

pub fn generate_tables(
    project_dir: &Path,
    data_dir_rel: &str,
    existing: &TableCatalog,
    options: GenerateOptions<'_>,
) -> Result<TableCatalog, InfrastructureError> {
    let data_dir = project_dir.join(data_dir_rel);
    if !data_dir.is_dir() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Data directory {:?} does not exist", data_dir),
        )));
    }

    let mut known: HashMap<String, TableMetadata> = existing
        .tables()
        .iter()
        .map(|t| (t.caminho_arquivo.clone(), t.clone()))
        .collect();
    let mut seen_names: HashSet<String> =
        known.values().map(|t| t.nome_tabela.clone()).collect();

    // 1. Scan (sorted for a stable output)
    let mut found: Vec<(std::path::PathBuf, &'static str)> = WalkDir::new(&data_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| format_tag(e.path()).map(|tag| (e.into_path(), tag)))
        .collect();
    found.sort();

    // 2. Merge
    let mut tables = Vec::new();
    for (path, tag) in found {
        let rel = path.strip_prefix(project_dir).unwrap_or(&path);
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if let Some(kept) = known.remove(&rel) {
            info!(table = %kept.nome_tabela, "Kept existing table entry");
            tables.push(kept);
            continue;
        }

        let suggested = derive_stable_name(&path, &data_dir);
        let mut name = suggested.clone();
        let mut i = 1;
        while seen_names.contains(&name) {
            name = format!("{}_{}", suggested, i);
            i += 1;
        }
        seen_names.insert(name.clone());

        let mut table = TableMetadata::new(name, rel, tag);
        if let Some(loader) = options.infer_roles {
            match loader.load(&path, tag) {
                Ok(dataset) => {
                    let numeric: Vec<String> = dataset
                        .column_names()
                        .filter(|c| dataset.column(c).is_some_and(|col| col.is_numeric()))
                        .map(String::from)
                        .collect();
                    if !numeric.is_empty() {
                        table
                            .roles
                            .insert(NUMERIC_ROLE.to_string(), OneOrMany::Many(numeric));
                    }
                }
                Err(e) => warn!(path = ?path, "Roles not inferred: {}", e),
            }
        }
        info!(table = %table.nome_tabela, path = %table.caminho_arquivo, "New table entry");
        tables.push(table);
    }

    // 3. Pruning
    for (missing_path, missing) in known {
        if options.prune {
            info!(table = %missing.nome_tabela, path = %missing_path, "Pruned (file not found)");
        } else {
            warn!(
                table = %missing.nome_tabela,
                path = %missing_path,
                "Table points to a missing file"
            );
            tables.push(missing);
        }
    }

    tables.sort_by(|a, b| a.nome_tabela.cmp(&b.nome_tabela));
    Ok(TableCatalog::new(tables))
}

/// `data/clientes.csv` -> `clientes`, `data/crm/clientes.csv` -> `crm_clientes`.
fn derive_stable_name(path: &Path, base_data_dir: &Path) -> String {
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    match path.parent() {
        Some(parent) if parent != base_data_dir => {
            let domain = parent.file_name().unwrap_or_default().to_string_lossy();
            format!("{}_{}", domain, stem)
        }
        _ => stem,
    }
}
