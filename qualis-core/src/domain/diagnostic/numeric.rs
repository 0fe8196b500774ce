// qualis-core/src/domain/diagnostic/numeric.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::analysis::{
    AnalysisPayload, AnalysisResult, IqrColumnOutcome, ZScoreColumnOutcome,
};
use crate::domain::diagnostic::{
    Category, DiagnosticRecord, Evidence, Finding, MULTI_COLUMN, Severity,
};
use crate::domain::error::DomainError;

const CORRELATION_EXAMPLES: usize = 3;

/// Business floor for the observed minimum of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeRule {
    pub min_aceitavel: f64,
    pub mensagem: String,
}

/// Magnitude rules keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagnitudeRules(BTreeMap<String, MagnitudeRule>);

impl Default for MagnitudeRules {
    fn default() -> Self {
        Self::new()
            .with("idade", 18.0, "Idade Mínima Irreal")
            .with("renda_mensal", 0.0, "Renda Negativa/Zero")
    }
}

impl MagnitudeRules {
    /// An empty table; `default()` carries the historical rules.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, column: impl Into<String>, floor: f64, message: impl Into<String>) -> Self {
        self.0.insert(
            column.into(),
            MagnitudeRule {
                min_aceitavel: floor,
                mensagem: message.into(),
            },
        );
        self
    }

    pub fn get(&self, column: &str) -> Option<&MagnitudeRule> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MagnitudeRule)> {
        self.0.iter()
    }
}

fn mismatch(expected: &'static str, found: &AnalysisPayload) -> DomainError {
    DomainError::PayloadMismatch {
        expected,
        found: found.kind(),
    }
}

fn stamp(result: &AnalysisResult, findings: Vec<Finding>) -> Vec<DiagnosticRecord> {
    findings
        .into_iter()
        .map(|f| DiagnosticRecord::from_finding(result, f))
        .collect()
}

/// ESTAT_MAGNITUDE_001 when a column minimum is strictly below its configured floor.
pub fn diagnose_descriptive(
    result: &AnalysisResult,
    rules: &MagnitudeRules,
) -> Result<Vec<DiagnosticRecord>, DomainError> {
    let summaries = match &result.dados_resultado {
        AnalysisPayload::Descriptive(s) => s.as_slice(),
        AnalysisPayload::Empty => &[],
        other => return Err(mismatch("descriptive", other)),
    };

    let findings = summaries
        .iter()
        .filter_map(|summary| {
            let rule = rules.get(&summary.coluna)?;
            let min = summary.min?;
            (min < rule.min_aceitavel).then(|| Finding {
                id: "ESTAT_MAGNITUDE_001",
                coluna: summary.coluna.clone(),
                severidade: Severity::Critical,
                categoria: Category::DataQuality,
                mensagem_curta: rule.mensagem.clone(),
                detalhe_tecnico: format!(
                    "O valor mínimo ({}) é menor que o limite aceitável ({}).",
                    float_text(min),
                    float_text(rule.min_aceitavel)
                ),
                recomendacao: "Limpar ou imputar valores mínimos fora do domínio aceitável.",
                evidencia: Evidence::Magnitude {
                    min_encontrado: min,
                    min_esperado: rule.min_aceitavel,
                },
            })
        })
        .collect();

    Ok(stamp(result, findings))
}

/// Whole numbers keep their decimal point: `-100.0`, not `-100`.
fn float_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        x.to_string()
    }
}

/// OUTLIER_IQR_001 per column with outliers.
pub fn diagnose_iqr(result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
    let columns = match &result.dados_resultado {
        AnalysisPayload::IqrOutliers(c) => c.as_slice(),
        AnalysisPayload::Empty => &[],
        other => return Err(mismatch("iqr_outliers", other)),
    };

    let findings = columns
        .iter()
        .filter_map(|c| match c.outcome {
            IqrColumnOutcome::Computed {
                outliers_count,
                limite_inferior,
                limite_superior,
                ..
            } if outliers_count > 0 => Some(Finding {
                id: "OUTLIER_IQR_001",
                coluna: c.coluna.clone(),
                severidade: Severity::Alert,
                categoria: Category::Distribution,
                mensagem_curta: "Outliers detectados por IQR.".to_string(),
                detalhe_tecnico: format!(
                    "{} registros são outliers IQR. Limites: [{:.2}, {:.2}].",
                    outliers_count, limite_inferior, limite_superior
                ),
                recomendacao: "Investigar a causa e considerar técnicas de tratamento de outliers para modelagem.",
                evidencia: Evidence::Outliers { outliers_count },
            }),
            _ => None,
        })
        .collect();

    Ok(stamp(result, findings))
}

/// OUTLIER_ZSCORE_002 per column with outliers. Informational only.
pub fn diagnose_zscore(result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
    let columns = match &result.dados_resultado {
        AnalysisPayload::ZScoreOutliers(c) => c.as_slice(),
        AnalysisPayload::Empty => &[],
        other => return Err(mismatch("zscore_outliers", other)),
    };

    let findings = columns
        .iter()
        .filter_map(|c| match c.outcome {
            ZScoreColumnOutcome::Computed {
                outliers_count,
                limite_zscore,
                mean,
                std,
            } if outliers_count > 0 => Some(Finding {
                id: "OUTLIER_ZSCORE_002",
                coluna: c.coluna.clone(),
                severidade: Severity::Info,
                categoria: Category::Distribution,
                mensagem_curta: "Outliers detectados via Z-Score (forte indicação de não-normalidade)."
                    .to_string(),
                detalhe_tecnico: format!(
                    "{} registros têm Z-Score > {}. Média={:.2}, DP={:.2}.",
                    outliers_count, limite_zscore, mean, std
                ),
                recomendacao: "Considerar transformação logarítmica ou não-paramétrica para modelagem.",
                evidencia: Evidence::Outliers { outliers_count },
            }),
            _ => None,
        })
        .collect();

    Ok(stamp(result, findings))
}

/// A single CORR_ALTA_001 for the whole matrix, at most three pairs quoted in the detail.
pub fn diagnose_correlation(result: &AnalysisResult) -> Result<Vec<DiagnosticRecord>, DomainError> {
    let pairs = match &result.dados_resultado {
        AnalysisPayload::Correlation(p) => p.pares_alta_correlacao.as_slice(),
        AnalysisPayload::Empty => &[],
        other => return Err(mismatch("correlation", other)),
    };
    if pairs.is_empty() {
        return Ok(vec![]);
    }

    let examples = pairs
        .iter()
        .take(CORRELATION_EXAMPLES)
        .map(|p| format!("{} vs {} (ρ={})", p.par[0], p.par[1], p.valor))
        .collect::<Vec<_>>()
        .join(", ");

    let finding = Finding {
        id: "CORR_ALTA_001",
        coluna: MULTI_COLUMN.to_string(),
        severidade: Severity::Alert,
        categoria: Category::Modeling,
        mensagem_curta: "Alta multicolinearidade potencial detectada.".to_string(),
        detalhe_tecnico: format!(
            "{} pares de colunas exibem alta correlação. Exemplos: {}.",
            pairs.len(),
            examples
        ),
        recomendacao: "Em modelos preditivos, considere remover ou combinar variáveis correlacionadas (ex: PCA) para evitar multicolinearidade e overfitting.",
        evidencia: Evidence::Correlation {
            total_pares: pairs.len(),
            pares_completos: pairs.to_vec(),
        },
    };

    Ok(stamp(result, vec![finding]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::analysis::{
        AnalysisOutcome, AnalysisStatus, ColumnOutcome, ColumnSummary, CorrelationPair,
        CorrelationPayload,
    };
    use anyhow::Result;

    fn result(tipo: &str, payload: AnalysisPayload) -> AnalysisResult {
        AnalysisResult::from_outcome(
            AnalysisOutcome::new(vec![], AnalysisStatus::Success, "", payload),
            "clientes",
            tipo,
            vec!["colunas_numericas".into()],
        )
    }

    fn summary(coluna: &str, min: Option<f64>) -> ColumnSummary {
        ColumnSummary {
            coluna: coluna.into(),
            count: 3,
            mean: Some(10.0),
            std: Some(1.0),
            min,
            quantis: vec![],
            max: Some(20.0),
        }
    }

    #[test]
    fn test_magnitude_rules_use_strict_floor() -> Result<()> {
        let payload = AnalysisPayload::Descriptive(vec![
            summary("idade", Some(18.0)),
            summary("renda_mensal", Some(-100.0)),
            summary("score", Some(-1.0e9)),
            summary("idade_vazia", None),
        ]);
        let records = diagnose_descriptive(&result("estatisticas", payload), &MagnitudeRules::default())?;

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id_diagnostico, "ESTAT_MAGNITUDE_001");
        assert_eq!(r.coluna, "renda_mensal");
        assert_eq!(r.mensagem_curta, "Renda Negativa/Zero");
        assert_eq!(
            r.detalhe_tecnico,
            "O valor mínimo (-100.0) é menor que o limite aceitável (0.0)."
        );
        assert_eq!(
            r.evidencia,
            Evidence::Magnitude { min_encontrado: -100.0, min_esperado: 0.0 }
        );
        Ok(())
    }

    #[test]
    fn test_custom_magnitude_rules_replace_defaults() -> Result<()> {
        let rules: MagnitudeRules =
            serde_yaml::from_str("score:\n  min_aceitavel: 0\n  mensagem: Score negativo")?;
        let payload = AnalysisPayload::Descriptive(vec![
            summary("score", Some(-1.0)),
            summary("idade", Some(3.0)),
        ]);
        let records = diagnose_descriptive(&result("estatisticas", payload), &rules)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mensagem_curta, "Score negativo");
        Ok(())
    }

    #[test]
    fn test_magnitude_detail_keeps_fractions() -> Result<()> {
        let rules: MagnitudeRules =
            serde_yaml::from_str("taxa:\n  min_aceitavel: 0.25\n  mensagem: Taxa baixa")?;
        let payload = AnalysisPayload::Descriptive(vec![summary("taxa", Some(0.125))]);
        let records = diagnose_descriptive(&result("estatisticas", payload), &rules)?;
        assert_eq!(
            records[0].detalhe_tecnico,
            "O valor mínimo (0.125) é menor que o limite aceitável (0.25)."
        );
        assert_eq!(float_text(18.0), "18.0");
        assert_eq!(float_text(-0.5), "-0.5");
        Ok(())
    }

    #[test]
    fn test_iqr_and_zscore_findings() -> Result<()> {
        let iqr = AnalysisPayload::IqrOutliers(vec![
            ColumnOutcome {
                coluna: "renda".into(),
                outcome: IqrColumnOutcome::Computed {
                    outliers_count: 2,
                    limite_inferior: -1.0,
                    limite_superior: 7.0,
                    q1: 2.0,
                    q3: 4.0,
                },
            },
            ColumnOutcome { coluna: "x".into(), outcome: IqrColumnOutcome::Insufficient },
        ]);
        let records = diagnose_iqr(&result("outliers_iqr", iqr))?;
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].detalhe_tecnico,
            "2 registros são outliers IQR. Limites: [-1.00, 7.00]."
        );

        let z = AnalysisPayload::ZScoreOutliers(vec![ColumnOutcome {
            coluna: "renda".into(),
            outcome: ZScoreColumnOutcome::Computed {
                outliers_count: 1,
                limite_zscore: 3.0,
                mean: 57.142857,
                std: 216.0,
            },
        }]);
        let records = diagnose_zscore(&result("outliers_zscore", z))?;
        assert_eq!(records[0].severidade, Severity::Info);
        assert_eq!(
            records[0].detalhe_tecnico,
            "1 registros têm Z-Score > 3. Média=57.14, DP=216.00."
        );
        Ok(())
    }

    #[test]
    fn test_correlation_summarizes_first_three_pairs() -> Result<()> {
        let pair = |a: &str, b: &str, v: f64| CorrelationPair {
            par: [a.to_string(), b.to_string()],
            valor: v,
        };
        let payload = AnalysisPayload::Correlation(CorrelationPayload {
            metodo: "pearson".into(),
            colunas: vec![],
            matriz_correlacao: vec![],
            pares_alta_correlacao: vec![
                pair("a", "b", 0.95),
                pair("a", "c", -0.91),
                pair("b", "c", 0.99),
                pair("c", "d", 0.97),
            ],
        });
        let records = diagnose_correlation(&result("correlacao", payload))?;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.coluna, MULTI_COLUMN);
        assert_eq!(
            r.detalhe_tecnico,
            "4 pares de colunas exibem alta correlação. Exemplos: a vs b (ρ=0.95), a vs c (ρ=-0.91), b vs c (ρ=0.99)."
        );
        let Evidence::Correlation { total_pares, pares_completos } = &r.evidencia else {
            anyhow::bail!("expected correlation evidence");
        };
        assert_eq!(*total_pares, 4);
        assert_eq!(pares_completos.len(), 4);
        Ok(())
    }

    #[test]
    fn test_wrong_payload_kind() {
        let r = result("x", AnalysisPayload::Descriptive(vec![]));
        assert!(diagnose_iqr(&r).is_err());
        assert!(diagnose_zscore(&r).is_err());
        assert!(diagnose_correlation(&r).is_err());
        assert!(diagnose_descriptive(&r, &MagnitudeRules::default()).unwrap().is_empty());
    }
}
