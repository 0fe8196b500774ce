// qualis-core/src/domain/analysis.rs
//
// Standardized analysis results exchanged between Phase 1 (collect) and Phase 2 (diagnose).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::dataset::TabularDataset;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "SUCESSO")]
    Success,
    #[serde(rename = "ALERTA")]
    Alert,
    #[serde(rename = "ERRO")]
    Error,
    #[serde(rename = "INFO")]
    Info,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCESSO",
            Self::Alert => "ALERTA",
            Self::Error => "ERRO",
            Self::Info => "INFO",
        }
    }

    /// Alert policy shared by the outlier tests.
    pub fn from_outlier_total(total: usize) -> Self {
        if total > 0 { Self::Alert } else { Self::Success }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntegrityPayload {
    EmptyTable { total_registros: usize },
    Checked(KeyIntegrity),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyIntegrity {
    pub total_registros: usize,
    pub coluna_pk: String,
    pub nulos_count: usize,
    pub duplicados_count: usize,
    pub percentual_duplicados: f64,
    pub percentual_nulos: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileValue {
    pub quantil: f64,
    pub rotulo: String,
    pub valor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub coluna: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub quantis: Vec<QuantileValue>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum IqrColumnOutcome {
    #[serde(rename = "Vazio")]
    Empty,
    #[serde(rename = "Insuficiente")]
    Insufficient,
    #[serde(rename = "Calculado")]
    Computed {
        outliers_count: usize,
        limite_inferior: f64,
        limite_superior: f64,
        #[serde(rename = "Q1")]
        q1: f64,
        #[serde(rename = "Q3")]
        q3: f64,
    },
}

impl IqrColumnOutcome {
    pub fn outliers_count(&self) -> usize {
        match self {
            Self::Computed { outliers_count, .. } => *outliers_count,
            Self::Empty | Self::Insufficient => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum ZScoreColumnOutcome {
    #[serde(rename = "Vazio")]
    Empty,
    #[serde(rename = "STD Zero")]
    DegenerateVariance,
    #[serde(rename = "Calculado")]
    Computed {
        outliers_count: usize,
        limite_zscore: f64,
        mean: f64,
        std: f64,
    },
}

impl ZScoreColumnOutcome {
    pub fn outliers_count(&self) -> usize {
        match self {
            Self::Computed { outliers_count, .. } => *outliers_count,
            Self::Empty | Self::DegenerateVariance => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutcome<T> {
    pub coluna: String,
    #[serde(flatten)]
    pub outcome: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub par: [String; 2],
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPayload {
    pub metodo: String,
    pub colunas: Vec<String>,
    /// Row-major, same order as `colunas`; `None` where the coefficient is undefined.
    pub matriz_correlacao: Vec<Vec<Option<f64>>>,
    pub pares_alta_correlacao: Vec<CorrelationPair>,
}

/// `dados_resultado`: one variant per analysis kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tipo", content = "dados", rename_all = "snake_case")]
pub enum AnalysisPayload {
    Empty,
    Integrity(IntegrityPayload),
    Descriptive(Vec<ColumnSummary>),
    IqrOutliers(Vec<ColumnOutcome<IqrColumnOutcome>>),
    ZScoreOutliers(Vec<ColumnOutcome<ZScoreColumnOutcome>>),
    Correlation(CorrelationPayload),
}

impl AnalysisPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Integrity(_) => "integrity",
            Self::Descriptive(_) => "descriptive",
            Self::IqrOutliers(_) => "iqr_outliers",
            Self::ZScoreOutliers(_) => "zscore_outliers",
            Self::Correlation(_) => "correlation",
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────

/// What an analysis handler returns, before the orchestrator adds traceability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub colunas_alvo: Vec<String>,
    pub status: AnalysisStatus,
    pub resumo_texto: String,
    pub dados_resultado: AnalysisPayload,
}

impl AnalysisOutcome {
    pub fn new(
        colunas_alvo: Vec<String>,
        status: AnalysisStatus,
        resumo_texto: impl Into<String>,
        dados_resultado: AnalysisPayload,
    ) -> Self {
        Self {
            colunas_alvo,
            status,
            resumo_texto: resumo_texto.into(),
            dados_resultado,
        }
    }

    pub fn error(colunas_alvo: Vec<String>, resumo_texto: impl Into<String>) -> Self {
        Self::new(
            colunas_alvo,
            AnalysisStatus::Error,
            resumo_texto,
            AnalysisPayload::Empty,
        )
    }

    /// Rejects outcomes naming columns the dataset does not have.
    pub fn check_against(&self, dataset: &TabularDataset) -> Result<(), DomainError> {
        match self.colunas_alvo.iter().find(|c| !dataset.has_column(c)) {
            Some(missing) => Err(DomainError::UnknownColumn(missing.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub colunas_alvo: Vec<String>,
    pub status: AnalysisStatus,
    pub resumo_texto: String,
    pub dados_resultado: AnalysisPayload,
    pub tabela: String,
    pub tipo_analise: String,
    pub tipo_alvo_meta: Vec<String>,
}

impl AnalysisResult {
    pub fn from_outcome(
        outcome: AnalysisOutcome,
        tabela: impl Into<String>,
        tipo_analise: impl Into<String>,
        tipo_alvo_meta: Vec<String>,
    ) -> Self {
        Self {
            colunas_alvo: outcome.colunas_alvo,
            status: outcome.status,
            resumo_texto: outcome.resumo_texto,
            dados_resultado: outcome.dados_resultado,
            tabela: tabela.into(),
            tipo_analise: tipo_analise.into(),
            tipo_alvo_meta,
        }
    }
}
