// qualis-core/src/error.rs

use crate::domain::error::{DatasetLoadError, DomainError};
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum QualisError {
    // --- DOMAIN (analysis / diagnostic execution) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (IO, parsing, configuration) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- REPORT SINK (the run's final failure) ---
    #[error("Report could not be delivered to '{sink}': {source}")]
    #[diagnostic(
        code(qualis::report_sink),
        help("The analysis ran; only the report output failed. Check the output path.")
    )]
    ReportSink {
        sink: String,
        #[source]
        source: InfrastructureError,
    },
}

impl From<std::io::Error> for QualisError {
    fn from(err: std::io::Error) -> Self {
        QualisError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<DatasetLoadError> for QualisError {
    fn from(err: DatasetLoadError) -> Self {
        QualisError::Infrastructure(InfrastructureError::Dataset(err))
    }
}
