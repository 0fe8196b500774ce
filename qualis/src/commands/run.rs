// qualis/src/commands/run.rs
//
// USE CASE: Run every rule on every table and deliver the report.

use std::path::PathBuf;
use std::sync::Arc;

use qualis_core::application::{HandlerRegistry, PipelineOrchestrator};
use qualis_core::domain::diagnostic::Severity;
use qualis_core::infrastructure::{ConsoleSink, FileDatasetLoader, JsonFileSink};
use qualis_core::ports::ReportSink;

use super::Project;

/// Exit code of `run --fail-on-critical` when criticals were found.
pub const CRITICAL_EXIT_CODE: i32 = 2;

pub struct RunArgs {
    pub output: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub fail_on_critical: bool,
    pub min_severity: Severity,
}

pub async fn execute(project_dir: PathBuf, args: RunArgs) -> anyhow::Result<()> {
    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let project = Project::load(&project_dir)?;
    println!(
        "   Project: {} (v{}) | {} tables, {} rules",
        project.config.name,
        project.config.version,
        project.tables.len(),
        project.rules.len()
    );

    // B. Bind handlers (unresolved ones are warnings)
    let catalog = project.catalog();
    let (registry, problems) = HandlerRegistry::build(&catalog, &project.rules);
    if !problems.is_empty() {
        eprintln!("⚠️  {} handler binding(s) skipped", problems.len());
    }

    // C. Run the Pipeline (Application Layer)
    let concurrency = args.concurrency.unwrap_or(project.config.concurrency);
    let orchestrator =
        PipelineOrchestrator::new(Arc::new(registry), Arc::new(FileDatasetLoader::new()))
            .with_concurrency(concurrency)
            .with_base_dir(&project.dir);

    let run = orchestrator.run(&project.tables, &project.rules).await;

    // D. Deliver
    let output = args
        .output
        .unwrap_or_else(|| project.dir.join(&project.config.output_path));
    JsonFileSink::new(&output).deliver(&run.report)?;
    ConsoleSink::new(args.min_severity).deliver(&run.report)?;

    if run.stats.tables_skipped > 0 {
        eprintln!("⚠️  {} table(s) skipped", run.stats.tables_skipped);
    }
    println!(
        "\n✨ Report written to {} in {:.2?}",
        output.display(),
        run.stats.duration
    );

    if args.fail_on_critical && run.report.has_criticals() {
        eprintln!(
            "❌ {} critical diagnostic(s) found.",
            run.report.resumo_execucao.total_criticos
        );
        // Exit with a distinct code for CI/CD
        std::process::exit(CRITICAL_EXIT_CODE);
    }

    Ok(())
}
