// qualis-core/src/domain/diagnostic/mod.rs
//
// Rule interpreters: one pure function per analysis kind, turning an
// AnalysisResult into severity-ranked DiagnosticRecords.

pub mod integrity;
pub mod numeric;

pub use integrity::diagnose_primary_key;
pub use numeric::{
    MagnitudeRule, MagnitudeRules, diagnose_correlation, diagnose_descriptive, diagnose_iqr,
    diagnose_zscore,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::analysis::{AnalysisResult, CorrelationPair, KeyIntegrity};

/// Column sentinel for findings spanning several columns.
pub const MULTI_COLUMN: &str = "N/A";

/// Ordered: `Info < Alert < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "ALERTA")]
    Alert,
    #[serde(rename = "CRÍTICO")]
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Alert => "ALERTA",
            Self::Critical => "CRÍTICO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "INTEGRIDADE")]
    Integrity,
    #[serde(rename = "QUALIDADE_DADOS")]
    DataQuality,
    #[serde(rename = "DISTRIBUIÇÃO")]
    Distribution,
    #[serde(rename = "MODELAGEM")]
    Modeling,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integrity => "INTEGRIDADE",
            Self::DataQuality => "QUALIDADE_DADOS",
            Self::Distribution => "DISTRIBUIÇÃO",
            Self::Modeling => "MODELAGEM",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `evidencia`: the facts a finding was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    KeyIntegrity(KeyIntegrity),
    Magnitude {
        min_encontrado: f64,
        min_esperado: f64,
    },
    Outliers {
        outliers_count: usize,
    },
    Correlation {
        total_pares: usize,
        pares_completos: Vec<CorrelationPair>,
    },
}

/// What an interpreter decided, before the origin of the result is stamped on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub id: &'static str,
    pub coluna: String,
    pub severidade: Severity,
    pub categoria: Category,
    pub mensagem_curta: String,
    pub detalhe_tecnico: String,
    pub recomendacao: &'static str,
    pub evidencia: Evidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub id_diagnostico: String,
    pub tabela: String,
    pub coluna: String,
    pub tipo_analise_origem: String,
    pub severidade: Severity,
    pub categoria: Category,
    pub mensagem_curta: String,
    pub detalhe_tecnico: String,
    pub recomendacao: String,
    pub evidencia: Evidence,
}

impl DiagnosticRecord {
    pub fn from_finding(result: &AnalysisResult, finding: Finding) -> Self {
        Self {
            id_diagnostico: finding.id.to_string(),
            tabela: result.tabela.clone(),
            coluna: finding.coluna,
            tipo_analise_origem: result.tipo_analise.clone(),
            severidade: finding.severidade,
            categoria: finding.categoria,
            mensagem_curta: finding.mensagem_curta,
            detalhe_tecnico: finding.detalhe_tecnico,
            recomendacao: finding.recomendacao.to_string(),
            evidencia: finding.evidencia,
        }
    }
}
