// src/domain/ports/handler.rs

use std::fmt;
use std::sync::Arc;

use crate::domain::analysis::{AnalysisOutcome, AnalysisResult};
use crate::domain::dataset::TabularDataset;
use crate::domain::diagnostic::DiagnosticRecord;
use crate::domain::error::DomainError;
use crate::domain::params::RuleParams;

/// Phase 1 capability: compute a standardized outcome over the resolved target columns.
pub trait AnalysisHandler: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(
        &self,
        dataset: &TabularDataset,
        columns: &[String],
        params: &RuleParams,
    ) -> Result<AnalysisOutcome, DomainError>;
}

/// Phase 2 capability: interpret one analysis result.
pub trait DiagnosticHandler: Send + Sync {
    fn name(&self) -> &str;

    fn diagnose(&self, result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError>;
}

/// A catalog entry, tagged with its capability.
#[derive(Clone)]
pub enum Handler {
    Analysis(Arc<dyn AnalysisHandler>),
    Diagnostic(Arc<dyn DiagnosticHandler>),
}

impl Handler {
    pub fn name(&self) -> &str {
        match self {
            Self::Analysis(h) => h.name(),
            Self::Diagnostic(h) => h.name(),
        }
    }

    pub fn capability(&self) -> &'static str {
        match self {
            Self::Analysis(_) => "analysis",
            Self::Diagnostic(_) => "diagnostic",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}({})", self.capability(), self.name())
    }
}
