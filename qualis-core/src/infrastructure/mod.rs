// qualis-core/src/infrastructure/mod.rs

pub mod config;
pub mod error;
pub mod fs;
pub mod loader;
pub mod sink;

pub use loader::FileDatasetLoader;
pub use sink::{ConsoleSink, JsonFileSink};
