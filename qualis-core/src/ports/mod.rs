// qualis-core/src/ports/mod.rs

pub mod sink;

pub use sink::ReportSink;
