// src/domain/ports/mod.rs

pub mod handler;
pub mod loader;

pub use handler::{AnalysisHandler, DiagnosticHandler, Handler};
pub use loader::DatasetLoader;
