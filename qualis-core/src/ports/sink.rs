// qualis-core/src/ports/sink.rs

// Outer boundary of a run: where the finished report goes.
// A delivery failure is the run's final failure.

use crate::domain::report::FinalReport;
use crate::error::QualisError;

pub trait ReportSink: Send + Sync {
    /// Human-readable destination, used in error messages.
    fn describe(&self) -> String;

    fn deliver(&self, report: &FinalReport) -> Result<(), QualisError>;
}
