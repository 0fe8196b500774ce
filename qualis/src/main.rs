// qualis/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug qualis run ... pour voir les détails
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_dir = cli.project_dir;

    match cli.command {
        Commands::Run {
            output,
            concurrency,
            fail_on_critical,
            min_severity,
        } => {
            commands::run::execute(
                project_dir,
                commands::run::RunArgs {
                    output,
                    concurrency,
                    fail_on_critical,
                    min_severity: min_severity.into(),
                },
            )
            .await
        }
        Commands::Validate { strict } => commands::validate::execute(project_dir, strict),
        Commands::Handlers { json } => commands::handlers::execute(project_dir, json),
        Commands::Generate {
            data_dir,
            prune,
            infer_roles,
        } => commands::generate::execute(project_dir, data_dir, prune, infer_roles),
    }
}
