// qualis-core/src/domain/stats/descriptive.rs

use crate::domain::analysis::{
    AnalysisOutcome, AnalysisPayload, AnalysisStatus, ColumnSummary, QuantileValue,
};
use crate::domain::dataset::{Column, TabularDataset};
use crate::domain::error::DomainError;
use crate::domain::stats::{mean, quantile_sorted, round_to, sample_std, sorted_copy};

pub const DEFAULT_PERCENTILES: [f64; 3] = [0.25, 0.5, 0.75];
pub const DEFAULT_DECIMALS: usize = 4;

/// count / mean / std / min / quantiles / max for every requested numeric column.
/// Absent and non-numeric columns are dropped; an empty selection is an `ERRO` outcome.
pub fn descriptive_statistics(
    dataset: &TabularDataset,
    columns: &[String],
    percentiles: &[f64],
    decimals: usize,
) -> AnalysisOutcome {
    let valid = dataset.numeric_columns(columns);
    let names: Vec<String> = valid.iter().map(|c| c.name().to_string()).collect();

    if valid.is_empty() {
        return AnalysisOutcome::error(
            names,
            "Nenhuma coluna válida foi encontrada no dataset para análise estatística.",
        );
    }

    let percentiles = match normalize_percentiles(percentiles) {
        Ok(p) => p,
        Err(e) => {
            return AnalysisOutcome::error(
                names,
                format!("Erro ao calcular estatísticas descritivas: {}", e),
            );
        }
    };

    let summaries: Vec<ColumnSummary> = valid
        .iter()
        .map(|column| summarize(column, &percentiles, decimals))
        .collect();

    AnalysisOutcome::new(
        names,
        AnalysisStatus::Success,
        format!(
            "Estatísticas descritivas calculadas para {} coluna(s) numérica(s).",
            summaries.len()
        ),
        AnalysisPayload::Descriptive(summaries),
    )
}

fn summarize(column: &Column, percentiles: &[f64], decimals: usize) -> ColumnSummary {
    let values = column.non_null_numbers();
    let sorted = sorted_copy(&values);
    let round = |v: Option<f64>| v.map(|x| round_to(x, decimals));

    ColumnSummary {
        coluna: column.name().to_string(),
        count: values.len(),
        mean: round(mean(&values)),
        std: round(sample_std(&values)),
        min: round(sorted.first().copied()),
        quantis: percentiles
            .iter()
            .map(|&q| QuantileValue {
                quantil: q,
                rotulo: percentile_label(q),
                valor: round(quantile_sorted(&sorted, q)),
            })
            .collect(),
        max: round(sorted.last().copied()),
    }
}

/// Validates, sorts and de-duplicates the requested percentiles; the median is always reported.
fn normalize_percentiles(requested: &[f64]) -> Result<Vec<f64>, DomainError> {
    if let Some(bad) = requested.iter().find(|q| !(0.0..=1.0).contains(*q)) {
        return Err(DomainError::InvalidParameter {
            key: "percentis".to_string(),
            reason: format!("percentiles should all be in the interval [0, 1], got {}", bad),
        });
    }
    let mut out = requested.to_vec();
    if !out.contains(&0.5) {
        out.push(0.5);
    }
    out.sort_by(f64::total_cmp);
    out.dedup();
    Ok(out)
}

/// 0.25 -> "25%", 0.333 -> "33.3%".
fn percentile_label(q: f64) -> String {
    let pct = (q * 100.0 * 1e6).round() / 1e6;
    format!("{}%", pct)
}
