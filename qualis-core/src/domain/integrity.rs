// qualis-core/src/domain/integrity.rs

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::analysis::{
    AnalysisOutcome, AnalysisPayload, AnalysisStatus, IntegrityPayload, KeyIntegrity,
};
use crate::domain::dataset::{ColumnValues, TabularDataset};

/// Uniqueness and non-nullity of the designated key column (first target).
pub fn validate_primary_key(dataset: &TabularDataset, columns: &[String]) -> AnalysisOutcome {
    let Some(pk) = columns.first() else {
        return AnalysisOutcome::error(
            vec![],
            "Nenhuma coluna de chave primária fornecida para validação.",
        );
    };

    let total = dataset.row_count();
    if total == 0 {
        let targets = if dataset.has_column(pk) { vec![pk.clone()] } else { vec![] };
        return AnalysisOutcome::new(
            targets,
            AnalysisStatus::Info,
            "Tabela vazia. Nenhuma validação de PK aplicada.",
            AnalysisPayload::Integrity(IntegrityPayload::EmptyTable { total_registros: 0 }),
        );
    }

    let Some(column) = dataset.column(pk) else {
        return AnalysisOutcome::error(
            vec![],
            format!("Coluna de chave primária '{}' não existe no dataset.", pk),
        );
    };

    let nulls = column.null_count();
    let repeated = match column.values() {
        // -0.0 and 0.0 are the same key
        ColumnValues::Numeric(v) => {
            rows_in_duplicated_values(v.iter().flatten().map(|x| (x + 0.0).to_bits()))
        }
        ColumnValues::Text(v) => rows_in_duplicated_values(v.iter().flatten().map(String::as_str)),
    };
    // Nulls are one more key: two or more of them are duplicates of each other.
    let duplicates = repeated + if nulls > 1 { nulls } else { 0 };

    let (status, resumo) = if nulls > 0 || duplicates > 0 {
        (
            AnalysisStatus::Alert,
            format!(
                "Falha na integridade da PK '{}': {} nulos e {} duplicados.",
                pk, nulls, duplicates
            ),
        )
    } else {
        (
            AnalysisStatus::Success,
            format!(
                "Chave primária '{}' validada com sucesso: 100% única e não nula.",
                pk
            ),
        )
    };

    let pct = |n: usize| n as f64 / total as f64 * 100.0;
    AnalysisOutcome::new(
        vec![pk.clone()],
        status,
        resumo,
        AnalysisPayload::Integrity(IntegrityPayload::Checked(KeyIntegrity {
            total_registros: total,
            coluna_pk: pk.clone(),
            nulos_count: nulls,
            duplicados_count: duplicates,
            percentual_duplicados: pct(duplicates),
            percentual_nulos: pct(nulls),
        })),
    )
}

/// Every occurrence of a value seen more than once.
fn rows_in_duplicated_values<K: Eq + Hash>(keys: impl Iterator<Item = K>) -> usize {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts.values().filter(|&&n| n > 1).sum()
}
