pub mod analysis;
pub mod dataset;
pub mod diagnostic;
pub mod error;
pub mod integrity;
pub mod params;
pub mod ports;
pub mod project;
pub mod report;
pub mod rule;
pub mod stats;
pub mod table;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
