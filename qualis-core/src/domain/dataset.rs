// qualis-core/src/domain/dataset.rs

use std::collections::HashSet;

use crate::domain::error::DomainError;

/// Tokens read as missing values, whatever the source format.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single raw cell as produced by a loader, before column typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Parses a textual cell: NA tokens become `Empty`, numeric literals become `Number`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NA_TOKENS.contains(&trimmed) {
            return RawCell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if !v.is_nan() => RawCell::Number(v),
            _ => RawCell::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        // NaN is a missing value, never a number.
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }

    /// Types a column from raw cells: numeric when every non-empty cell is a number,
    /// text otherwise (numbers are then kept in their textual form).
    pub fn from_cells(name: impl Into<String>, cells: Vec<RawCell>) -> Self {
        let all_numeric = cells
            .iter()
            .all(|c| matches!(c, RawCell::Empty | RawCell::Number(_)));

        if all_numeric {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    RawCell::Number(v) => Some(v),
                    _ => None,
                })
                .collect();
            Self::numeric(name, values)
        } else {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    RawCell::Empty => None,
                    RawCell::Number(v) => Some(v.to_string()),
                    RawCell::Text(s) => Some(s),
                })
                .collect();
            Self::text(name, values)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_positions(&self) -> Vec<usize> {
        match &self.values {
            ColumnValues::Numeric(v) => positions_of_none(v),
            ColumnValues::Text(v) => positions_of_none(v),
        }
    }

    pub fn null_count(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Non-null numeric values in row order. Empty for text columns.
    pub fn non_null_numbers(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|v| v.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

fn positions_of_none<T>(values: &[Option<T>]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.is_none().then_some(i))
        .collect()
}

/// In-memory table with named, equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl TabularDataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DomainError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(DomainError::RaggedDataset {
                    column: column.name.clone(),
                    expected: row_count,
                    found: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DomainError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn null_positions(&self, name: &str) -> Option<Vec<usize>> {
        self.column(name).map(Column::null_positions)
    }

    /// Keeps the requested columns that exist and are numeric, in request order.
    pub fn numeric_columns<'a>(&'a self, requested: &[String]) -> Vec<&'a Column> {
        requested
            .iter()
            .filter_map(|name| self.column(name))
            .filter(|c| c.is_numeric())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_raw_cell_parsing() {
        assert_eq!(RawCell::parse("42"), RawCell::Number(42.0));
        assert_eq!(RawCell::parse(" -3.5 "), RawCell::Number(-3.5));
        assert_eq!(RawCell::parse("NA"), RawCell::Empty);
        assert_eq!(RawCell::parse(""), RawCell::Empty);
        assert_eq!(RawCell::parse("nan"), RawCell::Empty);
        assert_eq!(RawCell::parse("abc"), RawCell::Text("abc".into()));
    }

    #[test]
    fn test_column_typing_falls_back_to_text() {
        let col = Column::from_cells(
            "mixed",
            vec![RawCell::Number(1.0), RawCell::Text("x".into()), RawCell::Empty],
        );
        assert!(!col.is_numeric());
        assert_eq!(col.null_positions(), vec![2]);

        let col = Column::from_cells("num", vec![RawCell::Number(1.0), RawCell::Empty]);
        assert!(col.is_numeric());
        assert_eq!(col.non_null_numbers(), vec![1.0]);
    }

    #[test]
    fn test_nan_is_treated_as_null() {
        let col = Column::numeric("x", vec![Some(f64::NAN), Some(2.0)]);
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn test_ragged_dataset_rejected() {
        let res = TabularDataset::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ]);
        assert!(matches!(res, Err(DomainError::RaggedDataset { .. })));
    }

    #[test]
    fn test_numeric_columns_filters_absent_and_text() -> Result<()> {
        let ds = TabularDataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::text("b", vec![Some("x".into())]),
        ])?;
        let requested = vec!["b".to_string(), "a".to_string(), "zz".to_string()];
        let names: Vec<&str> = ds.numeric_columns(&requested).iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a"]);
        assert_eq!(ds.row_count(), 1);
        Ok(())
    }
}
