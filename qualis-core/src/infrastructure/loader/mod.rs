// qualis-core/src/infrastructure/loader/mod.rs

pub mod delimited;
#[cfg(feature = "excel")]
pub mod workbook;

use std::path::Path;
use tracing::debug;

use crate::domain::dataset::{Column, RawCell, TabularDataset};
use crate::domain::error::DatasetLoadError;
use crate::domain::ports::DatasetLoader;

/// Reads `csv` and `excel` tables from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDatasetLoader;

impl FileDatasetLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetLoader for FileDatasetLoader {
    fn load(&self, path: &Path, format: &str) -> Result<TabularDataset, DatasetLoadError> {
        let tag = format.trim().to_ascii_lowercase();
        if !path.is_file() {
            return Err(DatasetLoadError::DatasetNotFound(path.to_path_buf()));
        }
        debug!(path = ?path, format = %tag, "Reading dataset");

        match tag.as_str() {
            "csv" => delimited::read_csv(path),
            #[cfg(feature = "excel")]
            "excel" => workbook::read_first_sheet(path),
            #[cfg(not(feature = "excel"))]
            "excel" => Err(DatasetLoadError::UnsupportedFormat(
                "excel (built without the 'excel' feature)".to_string(),
            )),
            _ => Err(DatasetLoadError::UnsupportedFormat(format.to_string())),
        }
    }
}

/// Header names as a dataframe would expose them: blanks become `Unnamed: i`,
/// repeats get a `.n` suffix.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = match name.trim() {
            "" => format!("Unnamed: {}", i),
            trimmed => trimmed.to_string(),
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        out.push(candidate);
    }
    out
}

/// Row-major cells to typed columns. Rows shorter than the header are padded with nulls.
pub(crate) fn build_dataset(
    path: &Path,
    headers: Vec<String>,
    rows: Vec<Vec<RawCell>>,
) -> Result<TabularDataset, DatasetLoadError> {
    let width = headers.len();
    let mut columns: Vec<Vec<RawCell>> = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(RawCell::Empty));
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| Column::from_cells(name, cells))
        .collect();

    TabularDataset::new(columns).map_err(|e| DatasetLoadError::DatasetReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_header_normalization() {
        let headers = normalize_headers(vec!["id".into(), " ".into(), "id".into(), "id".into()]);
        assert_eq!(headers, vec!["id", "Unnamed: 1", "id.1", "id.2"]);
    }

    #[test]
    fn test_format_dispatch() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("t.csv");
        fs::write(&path, "a,b\n1,2\n")?;
        let loader = FileDatasetLoader::new();

        assert_eq!(loader.load(&path, " CSV ")?.row_count(), 1);
        assert!(matches!(
            loader.load(&path, "parquet"),
            Err(DatasetLoadError::UnsupportedFormat(f)) if f == "parquet"
        ));
        assert!(matches!(
            loader.load(&dir.path().join("nope.csv"), "csv"),
            Err(DatasetLoadError::DatasetNotFound(_))
        ));
        Ok(())
    }
}
