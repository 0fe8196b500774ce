// qualis-core/src/domain/diagnostic/integrity.rs

use crate::domain::analysis::{AnalysisPayload, AnalysisResult, IntegrityPayload};
use crate::domain::diagnostic::{Category, DiagnosticRecord, Evidence, Finding, Severity};
use crate::domain::error::DomainError;

/// PK_INTEGRIDADE_001 on duplicates, PK_INTEGRIDADE_002 on nulls. Both may fire.
pub fn diagnose_primary_key(result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
    let key = match &result.dados_resultado {
        AnalysisPayload::Integrity(IntegrityPayload::Checked(key)) => key,
        AnalysisPayload::Integrity(IntegrityPayload::EmptyTable { .. }) | AnalysisPayload::Empty => {
            return Ok(vec![]);
        }
        other => {
            return Err(DomainError::PayloadMismatch {
                expected: "integrity",
                found: other.kind(),
            });
        }
    };

    let mut findings = Vec::new();

    if key.duplicados_count > 0 {
        findings.push(Finding {
            id: "PK_INTEGRIDADE_001",
            coluna: key.coluna_pk.clone(),
            severidade: Severity::Critical,
            categoria: Category::Integrity,
            mensagem_curta: "Chave primária não é única.".to_string(),
            detalhe_tecnico: format!(
                "{:.2}% ({} registros) da PK '{}' estão duplicados.",
                key.percentual_duplicados, key.duplicados_count, key.coluna_pk
            ),
            recomendacao: "Remover ou consolidar duplicados. Verificar o processo de geração/ETL da PK.",
            evidencia: Evidence::KeyIntegrity(key.clone()),
        });
    }

    if key.nulos_count > 0 {
        findings.push(Finding {
            id: "PK_INTEGRIDADE_002",
            coluna: key.coluna_pk.clone(),
            severidade: Severity::Alert,
            categoria: Category::DataQuality,
            mensagem_curta: "Chave primária contém valores nulos.".to_string(),
            detalhe_tecnico: format!(
                "{:.2}% ({} registros) da PK '{}' são nulos.",
                key.percentual_nulos, key.nulos_count, key.coluna_pk
            ),
            recomendacao: "Tratar valores nulos na PK, pois violam restrições de unicidade/obrigatoriedade.",
            evidencia: Evidence::KeyIntegrity(key.clone()),
        });
    }

    Ok(findings
        .into_iter()
        .map(|f| DiagnosticRecord::from_finding(result, f))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::analysis::{AnalysisOutcome, AnalysisStatus, KeyIntegrity};
    use anyhow::Result;

    fn result(payload: AnalysisPayload) -> AnalysisResult {
        AnalysisResult::from_outcome(
            AnalysisOutcome::new(vec!["id".into()], AnalysisStatus::Alert, "", payload),
            "clientes",
            "integridade_pk",
            vec!["chave_primaria".into()],
        )
    }

    fn key(nulls: usize, duplicates: usize) -> AnalysisPayload {
        AnalysisPayload::Integrity(IntegrityPayload::Checked(KeyIntegrity {
            total_registros: 4,
            coluna_pk: "id".into(),
            nulos_count: nulls,
            duplicados_count: duplicates,
            percentual_duplicados: duplicates as f64 / 4.0 * 100.0,
            percentual_nulos: nulls as f64 / 4.0 * 100.0,
        }))
    }

    #[test]
    fn test_both_rules_fire() -> Result<()> {
        let records = diagnose_primary_key(&result(key(1, 2)))?;
        assert_eq!(records.len(), 2);

        let dup = &records[0];
        assert_eq!(dup.id_diagnostico, "PK_INTEGRIDADE_001");
        assert_eq!(dup.severidade, Severity::Critical);
        assert_eq!(dup.tabela, "clientes");
        assert_eq!(dup.tipo_analise_origem, "integridade_pk");
        assert_eq!(dup.detalhe_tecnico, "50.00% (2 registros) da PK 'id' estão duplicados.");

        let nul = &records[1];
        assert_eq!(nul.id_diagnostico, "PK_INTEGRIDADE_002");
        assert_eq!(nul.severidade, Severity::Alert);
        assert_eq!(nul.categoria, Category::DataQuality);
        Ok(())
    }

    #[test]
    fn test_clean_and_empty_tables_are_silent() -> Result<()> {
        assert!(diagnose_primary_key(&result(key(0, 0)))?.is_empty());
        let empty = AnalysisPayload::Integrity(IntegrityPayload::EmptyTable { total_registros: 0 });
        assert!(diagnose_primary_key(&result(empty))?.is_empty());
        assert!(diagnose_primary_key(&result(AnalysisPayload::Empty))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_foreign_payload_is_rejected() {
        let err = diagnose_primary_key(&result(AnalysisPayload::Descriptive(vec![]))).unwrap_err();
        assert!(matches!(
            err,
            DomainError::PayloadMismatch { expected: "integrity", found: "descriptive" }
        ));
    }
}
