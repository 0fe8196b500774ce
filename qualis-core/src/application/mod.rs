// qualis-core/src/application/mod.rs

pub mod catalog;
pub mod handlers;
pub mod pipeline;
pub mod registry;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use qualis_core::application::{HandlerCatalog, HandlerRegistry, PipelineOrchestrator};`

pub use catalog::{CatalogEntry, HandlerCatalog};
pub use pipeline::{PipelineOrchestrator, PipelineRun, RunStats};
pub use registry::HandlerRegistry;
