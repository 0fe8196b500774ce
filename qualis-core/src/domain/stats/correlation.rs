// qualis-core/src/domain/stats/correlation.rs

use std::fmt;
use std::str::FromStr;

use crate::domain::analysis::{
    AnalysisOutcome, AnalysisPayload, AnalysisStatus, CorrelationPair, CorrelationPayload,
};
use crate::domain::dataset::TabularDataset;
use crate::domain::error::DomainError;
use crate::domain::stats::round_to;

pub const DEFAULT_HIGH_CORRELATION: f64 = 0.90;
const MATRIX_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    /// Pearson on average ranks.
    Spearman,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrelationMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            other => Err(DomainError::InvalidParameter {
                key: "metodo".to_string(),
                reason: format!("method must be either 'pearson' or 'spearman', got '{}'", other),
            }),
        }
    }
}

/// Pairwise-complete correlation matrix (unrounded).
/// A cell is `None` with fewer than two paired observations or a constant side.
pub fn correlation_matrix(
    columns: &[&[Option<f64>]],
    method: CorrelationMethod,
) -> Vec<Vec<Option<f64>>> {
    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(columns[j].iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();

            let r = match method {
                CorrelationMethod::Pearson => pearson(&xs, &ys),
                CorrelationMethod::Spearman => pearson(&average_ranks(&xs), &average_ranks(&ys)),
            };
            // Exact 1.0 on a defined diagonal.
            let r = if i == j { r.map(|_| 1.0) } else { r };

            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || ys.len() != n || is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mx = xs.iter().sum::<f64>() / n as f64;
    let my = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// 1-based ranks, ties get the mean of the ranks they span.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg;
        }
        start = end;
    }
    ranks
}

pub fn correlation_analysis(
    dataset: &TabularDataset,
    columns: &[String],
    method: &str,
    threshold: f64,
) -> AnalysisOutcome {
    let valid = dataset.numeric_columns(columns);
    let names: Vec<String> = valid.iter().map(|c| c.name().to_string()).collect();

    if valid.len() < 2 {
        return AnalysisOutcome::new(
            names,
            AnalysisStatus::Info,
            "Não há colunas suficientes (mínimo 2) para calcular a correlação.",
            AnalysisPayload::Empty,
        );
    }

    let method = match method.parse::<CorrelationMethod>() {
        Ok(m) => m,
        Err(e) => {
            return AnalysisOutcome::error(
                names,
                format!("Erro ao calcular a matriz de correlação: {}", e),
            );
        }
    };

    let series: Vec<&[Option<f64>]> = valid.iter().filter_map(|c| c.as_numeric()).collect();
    let matrix = correlation_matrix(&series, method);

    let mut pairs = Vec::new();
    for (i, row) in matrix.iter().enumerate() {
        for (j, cell) in row.iter().enumerate().skip(i + 1) {
            if let Some(r) = cell
                && r.abs() >= threshold
            {
                pairs.push(CorrelationPair {
                    par: [names[i].clone(), names[j].clone()],
                    valor: round_to(*r, MATRIX_DECIMALS),
                });
            }
        }
    }

    let status = if pairs.is_empty() {
        AnalysisStatus::Success
    } else {
        AnalysisStatus::Alert
    };
    let resumo = format!(
        "Análise de correlação ({}) concluída. {} pares com alta correlação (|ρ| ≥ {}) encontrados.",
        method,
        pairs.len(),
        threshold
    );
    let rounded = matrix
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.map(|r| round_to(r, MATRIX_DECIMALS)))
                .collect()
        })
        .collect();

    AnalysisOutcome::new(
        names.clone(),
        status,
        resumo,
        AnalysisPayload::Correlation(CorrelationPayload {
            metodo: method.to_string(),
            colunas: names,
            matriz_correlacao: rounded,
            pares_alta_correlacao: pairs,
        }),
    )
}
