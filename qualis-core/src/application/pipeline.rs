// qualis-core/src/application/pipeline.rs

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt; // Extension trait for streams
use tracing::{debug, info, instrument, warn};

use crate::application::registry::HandlerRegistry;
use crate::domain::analysis::AnalysisResult;
use crate::domain::error::{DatasetLoadError, DomainError};
use crate::domain::ports::DatasetLoader;
use crate::domain::report::FinalReport;
use crate::domain::rule::RuleSet;
use crate::domain::table::{TableCatalog, TableMetadata};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Counters kept out of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub tables_loaded: usize,
    pub tables_skipped: usize,
    pub results_discarded: usize,
    pub diagnostic_failures: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: FinalReport,
    pub stats: RunStats,
}

/// Phase 1 output of one table.
#[derive(Debug, Default)]
struct TableAnalysis {
    results: Vec<AnalysisResult>,
    discarded: usize,
}

/// Two-phase run: collect analysis results per table, then diagnose them.
pub struct PipelineOrchestrator {
    registry: Arc<HandlerRegistry>,
    loader: Arc<dyn DatasetLoader>,
    concurrency: usize,
    base_dir: Option<PathBuf>,
}

impl PipelineOrchestrator {
    pub fn new(registry: Arc<HandlerRegistry>, loader: Arc<dyn DatasetLoader>) -> Self {
        Self {
            registry,
            loader,
            concurrency: DEFAULT_CONCURRENCY,
            base_dir: None,
        }
    }

    /// Number of tables analysed at once. Clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Directory relative `caminho_arquivo` entries are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[instrument(skip_all, fields(tables = tables.len(), rules = rules.len()))]
    pub async fn run(&self, tables: &TableCatalog, rules: &RuleSet) -> PipelineRun {
        let start = Instant::now();
        let mut stats = RunStats::default();
        let rules = Arc::new(rules.clone());

        // 1. COLLECT (one blocking worker per table, bounded)
        info!("Phase 1: collecting analysis results");
        let jobs = tables.tables().iter().cloned().map(|table| {
            let registry = Arc::clone(&self.registry);
            let loader = Arc::clone(&self.loader);
            let rules = Arc::clone(&rules);
            let path = self.dataset_path(&table.caminho_arquivo);

            async move {
                let name = table.nome_tabela.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    analyze_table(&registry, loader.as_ref(), &rules, &table, &path)
                })
                .await;
                (name, joined)
            }
        });

        // `buffered` keeps configuration order whatever the completion order.
        let per_table: Vec<_> = futures::stream::iter(jobs)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut results = Vec::new();
        for (table, joined) in per_table {
            match joined {
                Ok(Ok(analysis)) => {
                    stats.tables_loaded += 1;
                    stats.results_discarded += analysis.discarded;
                    results.extend(analysis.results);
                }
                Ok(Err(e)) => {
                    warn!(table = %table, "Dataset could not be loaded, table skipped: {}", e);
                    stats.tables_skipped += 1;
                }
                Err(e) => {
                    warn!(table = %table, "Table worker failed, table skipped: {}", e);
                    stats.tables_skipped += 1;
                }
            }
        }

        // 2. DIAGNOSE
        info!(results = results.len(), "Phase 2: interpreting analysis results");
        let mut records = Vec::new();
        for result in &results {
            let Some(handler) = self.registry.diagnostic(&result.tipo_analise) else {
                continue;
            };
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| handler.diagnose(result)));
            match attempt.unwrap_or_else(|payload| Err(panicked(payload))) {
                Ok(found) => {
                    debug!(
                        table = %result.tabela,
                        rule = %result.tipo_analise,
                        records = found.len(),
                        "Diagnostic applied"
                    );
                    records.extend(found);
                }
                Err(e) => {
                    warn!(
                        table = %result.tabela,
                        rule = %result.tipo_analise,
                        "Diagnostic failed, no records emitted: {}",
                        e
                    );
                    stats.diagnostic_failures += 1;
                }
            }
        }

        // 3. REPORT
        let report = FinalReport::assemble(
            chrono::Utc::now().to_rfc3339(),
            tables.len(),
            results.len(),
            records,
        );
        stats.duration = start.elapsed();

        info!(
            tables_loaded = stats.tables_loaded,
            tables_skipped = stats.tables_skipped,
            results_discarded = stats.results_discarded,
            diagnostic_failures = stats.diagnostic_failures,
            alerts = report.resumo_execucao.total_alertas,
            criticals = report.resumo_execucao.total_criticos,
            elapsed_ms = stats.duration.as_millis() as u64,
            "Run finished"
        );

        PipelineRun { report, stats }
    }

    fn dataset_path(&self, location: &str) -> PathBuf {
        let raw = Path::new(location);
        match &self.base_dir {
            Some(base) if raw.is_relative() => base.join(raw),
            _ => raw.to_path_buf(),
        }
    }
}

/// Load one dataset and run every runnable rule on it, in rule order.
/// The dataset is dropped on return.
fn analyze_table(
    registry: &HandlerRegistry,
    loader: &dyn DatasetLoader,
    rules: &RuleSet,
    table: &TableMetadata,
    path: &Path,
) -> Result<TableAnalysis, DatasetLoadError> {
    let dataset = loader.load(path, &table.tipo_arquivo)?;
    debug!(
        table = %table.nome_tabela,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Dataset loaded"
    );

    let mut out = TableAnalysis::default();
    for rule in rules.rules() {
        let id = rule.tipo_analise.as_str();
        let Some(handler) = registry.analysis(id) else {
            continue;
        };

        let roles = rule.target_roles();
        let columns = table.resolve_columns(&roles);
        if columns.is_empty() {
            debug!(table = %table.nome_tabela, rule = id, "No target columns, rule skipped");
            continue;
        }

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.analyze(&dataset, &columns, &rule.parametros)
        }));
        let outcome = attempt
            .unwrap_or_else(|payload| Err(panicked(payload)))
            .and_then(|o| o.check_against(&dataset).map(|()| o));
        match outcome {
            Ok(outcome) => {
                debug!(
                    table = %table.nome_tabela,
                    rule = id,
                    status = %outcome.status,
                    "Analysis collected"
                );
                out.results.push(AnalysisResult::from_outcome(
                    outcome,
                    table.nome_tabela.clone(),
                    id,
                    roles,
                ));
            }
            Err(e) => {
                warn!(
                    table = %table.nome_tabela,
                    rule = id,
                    "Analysis failed, result discarded: {}",
                    e
                );
                out.discarded += 1;
            }
        }
    }
    Ok(out)
}

/// A handler panic is a failure of that handler only.
fn panicked(payload: Box<dyn Any + Send>) -> DomainError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    DomainError::HandlerPanicked(message)
}
