// qualis-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::DatasetLoadError;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(qualis::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(qualis::infra::yaml),
        help("Check your YAML/JSON syntax (indentation, types, required keys).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(qualis::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(qualis::infra::config))]
    ConfigError(String),

    #[error("Configuration file not found at '{0}'")]
    #[diagnostic(
        code(qualis::infra::config_missing),
        help("Create it, point 'tables-path' / 'rules-path' in qualis.yaml at it, or run 'qualis generate'.")
    )]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(qualis::infra::validation))]
    Validation(#[from] validator::ValidationErrors),

    // --- DATA FILES ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetLoadError),
}
