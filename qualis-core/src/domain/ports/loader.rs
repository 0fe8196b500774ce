use crate::domain::dataset::TabularDataset;
use crate::domain::error::DatasetLoadError;
use std::path::Path;

/// Reads a dataset from its location. `format` is the table's `tipo_arquivo` tag.
pub trait DatasetLoader: Send + Sync {
    fn load(&self, path: &Path, format: &str) -> Result<TabularDataset, DatasetLoadError>;
}
