// qualis-core/src/infrastructure/loader/workbook.rs

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

use crate::domain::dataset::{NA_TOKENS, RawCell, TabularDataset};
use crate::domain::error::DatasetLoadError;
use crate::infrastructure::loader::{build_dataset, normalize_headers};

/// First worksheet, first row as header.
pub fn read_first_sheet(path: &Path) -> Result<TabularDataset, DatasetLoadError> {
    let read_err = |reason: String| DatasetLoadError::DatasetReadError {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_err("workbook has no worksheet".to_string()))?
        .map_err(|e| read_err(e.to_string()))?;

    dataset_from_range(path, &range)
}

/// The used range starts at the first non-empty cell; leading blank columns
/// are restored so headers line up with column A.
fn dataset_from_range(path: &Path, range: &Range<Data>) -> Result<TabularDataset, DatasetLoadError> {
    let leading = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(DatasetLoadError::DatasetReadError {
            path: path.to_path_buf(),
            reason: "no columns to parse from sheet".to_string(),
        });
    };
    let headers = normalize_headers(
        std::iter::repeat_n(String::new(), leading)
            .chain(header.iter().map(header_text))
            .collect(),
    );

    let cells = rows
        .map(|row| {
            std::iter::repeat_n(RawCell::Empty, leading)
                .chain(row.iter().map(to_cell))
                .collect::<Vec<_>>()
        })
        .collect();

    build_dataset(path, headers, cells)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) if f.is_nan() => RawCell::Empty,
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) if NA_TOKENS.contains(&s.trim()) => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Empty | Data::Error(_) => RawCell::Empty,
        other => RawCell::Text(other.to_string()),
    }
}
