// qualis-core/src/domain/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Ragged dataset: column '{column}' has {found} rows, expected {expected}")]
    #[diagnostic(
        code(qualis::domain::ragged),
        help("Every column of a table must hold the same number of rows.")
    )]
    RaggedDataset {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column name '{0}' in dataset")]
    #[diagnostic(code(qualis::domain::duplicate_column))]
    DuplicateColumn(String),

    #[error("Invalid parameter '{key}': {reason}")]
    #[diagnostic(
        code(qualis::domain::parameter),
        help("Check the 'parametros' block of the rule.")
    )]
    InvalidParameter { key: String, reason: String },

    #[error("Payload mismatch: handler expects a '{expected}' result but received '{found}'")]
    #[diagnostic(
        code(qualis::domain::payload),
        help("The rule binds a diagnostic handler to an analysis of another kind.")
    )]
    PayloadMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Analysed column '{0}' does not exist in the dataset")]
    #[diagnostic(code(qualis::domain::unknown_column))]
    UnknownColumn(String),

    #[error("Handler panicked: {0}")]
    #[diagnostic(code(qualis::domain::handler_panic))]
    HandlerPanicked(String),
}

/// Failure of the dataset loader port. Any of these skips the table.
#[derive(Error, Debug, Diagnostic)]
pub enum DatasetLoadError {
    #[error("Dataset not found at {0:?}")]
    #[diagnostic(
        code(qualis::dataset::not_found),
        help("Check 'caminho_arquivo' in the table metadata.")
    )]
    DatasetNotFound(PathBuf),

    #[error("Unsupported dataset format '{0}'. Supported: 'csv', 'excel'")]
    #[diagnostic(code(qualis::dataset::format))]
    UnsupportedFormat(String),

    #[error("Failed to read dataset {path:?}: {reason}")]
    #[diagnostic(code(qualis::dataset::read))]
    DatasetReadError { path: PathBuf, reason: String },
}

/// A rule whose handler name could not be bound at registry construction.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum HandlerResolutionError {
    #[error("Rule '{rule}' declares no handler namespace ('modulo')")]
    #[diagnostic(code(qualis::registry::no_namespace))]
    MissingNamespace { rule: String },

    #[error("Rule '{rule}': unknown handler namespace '{namespace}'")]
    #[diagnostic(
        code(qualis::registry::namespace),
        help("Run 'qualis handlers' to list the available namespaces.")
    )]
    UnknownNamespace { rule: String, namespace: String },

    #[error("Rule '{rule}': no handler '{name}' in namespace '{namespace}'")]
    #[diagnostic(
        code(qualis::registry::handler),
        help("Run 'qualis handlers' to list the available handlers.")
    )]
    UnknownHandler {
        rule: String,
        namespace: String,
        name: String,
    },

    #[error("Rule '{rule}': handler '{name}' is not a {expected} handler")]
    #[diagnostic(code(qualis::registry::capability))]
    CapabilityMismatch {
        rule: String,
        name: String,
        expected: &'static str,
    },
}

impl HandlerResolutionError {
    pub fn rule(&self) -> &str {
        match self {
            Self::MissingNamespace { rule }
            | Self::UnknownNamespace { rule, .. }
            | Self::UnknownHandler { rule, .. }
            | Self::CapabilityMismatch { rule, .. } => rule,
        }
    }
}
