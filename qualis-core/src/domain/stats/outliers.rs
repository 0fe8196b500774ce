// qualis-core/src/domain/stats/outliers.rs

use crate::domain::analysis::{
    AnalysisOutcome, AnalysisPayload, AnalysisStatus, ColumnOutcome, IqrColumnOutcome,
    ZScoreColumnOutcome,
};
use crate::domain::dataset::TabularDataset;
use crate::domain::stats::{mean, quantile_sorted, sample_std, sorted_copy};

pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_ZSCORE_LIMIT: f64 = 3.0;

/// Tukey fences on the non-null values of one column.
/// Bounds need at least two values; a single value is `Insufficient`.
pub fn iqr_column(values: &[f64], multiplier: f64) -> IqrColumnOutcome {
    match values.len() {
        0 => return IqrColumnOutcome::Empty,
        1 => return IqrColumnOutcome::Insufficient,
        _ => {}
    }

    let sorted = sorted_copy(values);
    let (Some(q1), Some(q3)) = (quantile_sorted(&sorted, 0.25), quantile_sorted(&sorted, 0.75))
    else {
        return IqrColumnOutcome::Insufficient;
    };
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;

    IqrColumnOutcome::Computed {
        outliers_count: values.iter().filter(|&&v| v < lower || v > upper).count(),
        limite_inferior: lower,
        limite_superior: upper,
        q1,
        q3,
    }
}

pub fn iqr_outliers(dataset: &TabularDataset, columns: &[String], multiplier: f64) -> AnalysisOutcome {
    let valid = dataset.numeric_columns(columns);

    let per_column: Vec<ColumnOutcome<IqrColumnOutcome>> = valid
        .iter()
        .map(|c| ColumnOutcome {
            coluna: c.name().to_string(),
            outcome: iqr_column(&c.non_null_numbers(), multiplier),
        })
        .collect();
    let total: usize = per_column.iter().map(|c| c.outcome.outliers_count()).sum();

    AnalysisOutcome::new(
        valid.iter().map(|c| c.name().to_string()).collect(),
        AnalysisStatus::from_outlier_total(total),
        format!("Teste IQR concluído. Total de outliers encontrados: {}.", total),
        AnalysisPayload::IqrOutliers(per_column),
    )
}

/// |z| > `threshold` on the non-null values of one column, using the sample deviation.
pub fn zscore_column(values: &[f64], threshold: f64) -> ZScoreColumnOutcome {
    if values.is_empty() {
        return ZScoreColumnOutcome::Empty;
    }

    let (Some(m), Some(std)) = (mean(values), sample_std(values)) else {
        return ZScoreColumnOutcome::DegenerateVariance;
    };
    // A constant column can leave rounding residue in the deviation.
    if std == 0.0 || values.iter().all(|&v| v == values[0]) {
        return ZScoreColumnOutcome::DegenerateVariance;
    }

    ZScoreColumnOutcome::Computed {
        outliers_count: values
            .iter()
            .filter(|&&v| ((v - m) / std).abs() > threshold)
            .count(),
        limite_zscore: threshold,
        mean: m,
        std,
    }
}

pub fn zscore_outliers(dataset: &TabularDataset, columns: &[String], threshold: f64) -> AnalysisOutcome {
    let valid = dataset.numeric_columns(columns);

    let per_column: Vec<ColumnOutcome<ZScoreColumnOutcome>> = valid
        .iter()
        .map(|c| ColumnOutcome {
            coluna: c.name().to_string(),
            outcome: zscore_column(&c.non_null_numbers(), threshold),
        })
        .collect();
    let total: usize = per_column.iter().map(|c| c.outcome.outliers_count()).sum();

    AnalysisOutcome::new(
        valid.iter().map(|c| c.name().to_string()).collect(),
        AnalysisStatus::from_outlier_total(total),
        format!(
            "Teste Z-Score concluído. Total de outliers encontrados: {} (Z > {}).",
            total, threshold
        ),
        AnalysisPayload::ZScoreOutliers(per_column),
    )
}
