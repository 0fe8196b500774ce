// qualis-core/src/infrastructure/sink/json.rs

use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::report::FinalReport;
use crate::error::QualisError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::ReportSink;

/// Pretty UTF-8 JSON, written atomically.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, report: &FinalReport) -> Result<(), InfrastructureError> {
        let content = serde_json::to_string_pretty(report)?;
        atomic_write(&self.path, content)
    }
}

impl ReportSink for JsonFileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn deliver(&self, report: &FinalReport) -> Result<(), QualisError> {
        self.write(report).map_err(|source| QualisError::ReportSink {
            sink: self.describe(),
            source,
        })?;
        info!(path = ?self.path, "Report written");
        Ok(())
    }
}
