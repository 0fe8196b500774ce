// qualis-core/src/application/handlers.rs
//
// Built-in handlers: parameter decoding around the pure domain functions.

use crate::domain::analysis::{AnalysisOutcome, AnalysisResult};
use crate::domain::dataset::TabularDataset;
use crate::domain::diagnostic::{self, DiagnosticRecord, MagnitudeRules};
use crate::domain::error::DomainError;
use crate::domain::integrity::validate_primary_key;
use crate::domain::params::RuleParams;
use crate::domain::ports::{AnalysisHandler, DiagnosticHandler};
use crate::domain::stats::{
    self,
    correlation::DEFAULT_HIGH_CORRELATION,
    descriptive::{DEFAULT_DECIMALS, DEFAULT_PERCENTILES},
    outliers::{DEFAULT_IQR_MULTIPLIER, DEFAULT_ZSCORE_LIMIT},
};

pub const INTEGRITY_NAMESPACE: &str = "integridade";
pub const NUMERIC_NAMESPACE: &str = "numericas";

pub type AnalysisFn =
    fn(&TabularDataset, &[String], &RuleParams) -> Result<AnalysisOutcome, DomainError>;
pub type DiagnosticFn = fn(&AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError>;

/// Adapts a plain function to the analysis port.
pub struct FnAnalysis {
    name: &'static str,
    run: AnalysisFn,
}

impl FnAnalysis {
    pub const fn new(name: &'static str, run: AnalysisFn) -> Self {
        Self { name, run }
    }
}

impl AnalysisHandler for FnAnalysis {
    fn name(&self) -> &str {
        self.name
    }

    fn analyze(
        &self,
        dataset: &TabularDataset,
        columns: &[String],
        params: &RuleParams,
    ) -> Result<AnalysisOutcome, DomainError> {
        (self.run)(dataset, columns, params)
    }
}

/// Adapts a plain function to the diagnostic port.
pub struct FnDiagnostic {
    name: &'static str,
    run: DiagnosticFn,
}

impl FnDiagnostic {
    pub const fn new(name: &'static str, run: DiagnosticFn) -> Self {
        Self { name, run }
    }
}

impl DiagnosticHandler for FnDiagnostic {
    fn name(&self) -> &str {
        self.name
    }

    fn diagnose(&self, result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
        (self.run)(result)
    }
}

/// `diagnostico_estatistico`, bound to a magnitude-rule table.
pub struct MagnitudeDiagnostic {
    rules: MagnitudeRules,
}

impl MagnitudeDiagnostic {
    pub const NAME: &'static str = "diagnostico_estatistico";

    pub fn new(rules: MagnitudeRules) -> Self {
        Self { rules }
    }
}

impl DiagnosticHandler for MagnitudeDiagnostic {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn diagnose(&self, result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
        diagnostic::diagnose_descriptive(result, &self.rules)
    }
}

// --- integridade ---

pub fn primary_key(
    dataset: &TabularDataset,
    columns: &[String],
    _params: &RuleParams,
) -> Result<AnalysisOutcome, DomainError> {
    Ok(validate_primary_key(dataset, columns))
}

// --- numericas ---

pub fn descriptive(
    dataset: &TabularDataset,
    columns: &[String],
    params: &RuleParams,
) -> Result<AnalysisOutcome, DomainError> {
    let percentiles = params.f64_list_or("percentis", &DEFAULT_PERCENTILES)?;
    let decimals = params.usize_or("arredondamento", DEFAULT_DECIMALS)?;
    Ok(stats::descriptive_statistics(dataset, columns, &percentiles, decimals))
}

pub fn iqr(
    dataset: &TabularDataset,
    columns: &[String],
    params: &RuleParams,
) -> Result<AnalysisOutcome, DomainError> {
    let k = params.f64_or("multiplicador_iqr", DEFAULT_IQR_MULTIPLIER)?;
    Ok(stats::iqr_outliers(dataset, columns, k))
}

pub fn zscore(
    dataset: &TabularDataset,
    columns: &[String],
    params: &RuleParams,
) -> Result<AnalysisOutcome, DomainError> {
    let limit = params.f64_or("limite_zscore", DEFAULT_ZSCORE_LIMIT)?;
    Ok(stats::zscore_outliers(dataset, columns, limit))
}

pub fn correlation(
    dataset: &TabularDataset,
    columns: &[String],
    params: &RuleParams,
) -> Result<AnalysisOutcome, DomainError> {
    let method = params.str_or("metodo", "pearson")?;
    let threshold = params.f64_or("limite_alta_correlacao", DEFAULT_HIGH_CORRELATION)?;
    Ok(stats::correlation_analysis(dataset, columns, method, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::AnalysisStatus;
    use crate::domain::dataset::Column;
    use anyhow::Result;

    #[test]
    fn test_parameters_reach_the_engine() -> Result<()> {
        let ds = TabularDataset::new(vec![Column::numeric(
            "x",
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(9.0)],
        )])?;
        let cols = vec!["x".to_string()];

        // k = 1.5: upper fence 7.0, 9.0 is out
        assert_eq!(iqr(&ds, &cols, &RuleParams::new())?.status, AnalysisStatus::Alert);
        // k = 3.0: upper fence 10.0
        let wide = RuleParams::new().with("multiplicador_iqr", 3.0);
        assert_eq!(iqr(&ds, &cols, &wide)?.status, AnalysisStatus::Success);
        Ok(())
    }

    #[test]
    fn test_malformed_parameter_is_an_execution_error() -> Result<()> {
        let ds = TabularDataset::new(vec![Column::numeric("x", vec![Some(1.0)])])?;
        let params = RuleParams::new().with("percentis", "quartis");
        assert!(matches!(
            descriptive(&ds, &["x".to_string()], &params),
            Err(DomainError::InvalidParameter { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_fn_adapters_report_their_names() {
        let a = FnAnalysis::new("teste_de_outliers_iqr", iqr);
        assert_eq!(a.name(), "teste_de_outliers_iqr");
        let d = MagnitudeDiagnostic::new(MagnitudeRules::default());
        assert_eq!(d.name(), "diagnostico_estatistico");
    }
}
