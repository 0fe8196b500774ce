// qualis-core/src/domain/report.rs

use serde::Serialize;

use crate::domain::diagnostic::{DiagnosticRecord, Severity};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    pub data_execucao: String,
    pub total_tabelas: usize,
    pub total_analises_executadas: usize,
    pub total_alertas: usize,
    pub total_criticos: usize,
}

/// The single artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub resumo_execucao: ExecutionSummary,
    pub diagnosticos_registrados: Vec<DiagnosticRecord>,
}

impl FinalReport {
    /// Severity tallies are derived from `records`, never supplied.
    pub fn assemble(
        data_execucao: impl Into<String>,
        total_tabelas: usize,
        total_analises_executadas: usize,
        records: Vec<DiagnosticRecord>,
    ) -> Self {
        let count = |s: Severity| records.iter().filter(|r| r.severidade == s).count();
        Self {
            resumo_execucao: ExecutionSummary {
                data_execucao: data_execucao.into(),
                total_tabelas,
                total_analises_executadas,
                total_alertas: count(Severity::Alert),
                total_criticos: count(Severity::Critical),
            },
            diagnosticos_registrados: records,
        }
    }

    pub fn has_criticals(&self) -> bool {
        self.resumo_execucao.total_criticos > 0
    }

    /// Records of at least `min` severity, in report order.
    pub fn records_at_least(&self, min: Severity) -> impl Iterator<Item = &DiagnosticRecord> {
        self.diagnosticos_registrados
            .iter()
            .filter(move |r| r.severidade >= min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostic::{Category, Evidence};
    use anyhow::Result;

    fn record(id: &str, severidade: Severity) -> DiagnosticRecord {
        DiagnosticRecord {
            id_diagnostico: id.into(),
            tabela: "t".into(),
            coluna: "c".into(),
            tipo_analise_origem: "x".into(),
            severidade,
            categoria: Category::DataQuality,
            mensagem_curta: String::new(),
            detalhe_tecnico: String::new(),
            recomendacao: String::new(),
            evidencia: Evidence::Outliers { outliers_count: 1 },
        }
    }

    #[test]
    fn test_tallies_are_exact() -> Result<()> {
        let report = FinalReport::assemble(
            "2026-01-01T00:00:00+00:00",
            3,
            7,
            vec![
                record("a", Severity::Critical),
                record("b", Severity::Alert),
                record("c", Severity::Info),
                record("d", Severity::Critical),
            ],
        );
        assert_eq!(report.resumo_execucao.total_criticos, 2);
        assert_eq!(report.resumo_execucao.total_alertas, 1);
        assert!(report.has_criticals());
        assert_eq!(report.records_at_least(Severity::Alert).count(), 3);

        let v = serde_json::to_value(&report)?;
        assert_eq!(v["resumo_execucao"]["total_tabelas"], 3);
        assert_eq!(v["diagnosticos_registrados"][0]["severidade"], "CRÍTICO");
        Ok(())
    }
}
