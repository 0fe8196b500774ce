// qualis/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qualis_core::domain::diagnostic::Severity;

#[derive(Parser)]
#[command(name = "qualis")]
#[command(about = "Configuration-driven data-quality diagnostics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds qualis.yaml and the config files)
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs every rule on every table and writes the report
    Run {
        /// Report path (overrides output-path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Tables analysed at once (overrides concurrency)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Exit with code 2 when the report holds critical diagnostics
        #[arg(long)]
        fail_on_critical: bool,

        /// Lowest severity printed in the console table
        #[arg(long, value_enum, default_value_t = SeverityArg::Info)]
        min_severity: SeverityArg,
    },

    /// 🔎 Loads the configuration and resolves every handler, without reading data
    Validate {
        /// Exit with an error on any warning
        #[arg(long)]
        strict: bool,
    },

    /// 📚 Lists the registered handlers by namespace
    Handlers {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// 🕵️‍♀️ Scans a data directory and updates the table metadata file
    Generate {
        /// Data directory relative to the project
        #[arg(long, default_value = "data")]
        data_dir: String,

        /// Remove tables whose file no longer exists
        #[arg(long)]
        prune: bool,

        /// Load each new file and fill 'colunas_numericas'
        #[arg(long)]
        infer_roles: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Info,
    Alerta,
    Critico,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Alerta => Severity::Alert,
            SeverityArg::Critico => Severity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["qualis", "run"]);
        assert_eq!(args.project_dir.to_string_lossy(), ".");
        match args.command {
            Commands::Run {
                output,
                concurrency,
                fail_on_critical,
                min_severity,
            } => {
                assert_eq!(output, None);
                assert_eq!(concurrency, None);
                assert!(!fail_on_critical);
                assert_eq!(min_severity, SeverityArg::Info);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_overrides() -> Result<()> {
        let args = Cli::parse_from([
            "qualis",
            "run",
            "--project-dir",
            "/tmp",
            "--output",
            "out.json",
            "--concurrency",
            "8",
            "--fail-on-critical",
            "--min-severity",
            "critico",
        ]);
        assert_eq!(args.project_dir.to_string_lossy(), "/tmp");
        match args.command {
            Commands::Run {
                output,
                concurrency,
                fail_on_critical,
                min_severity,
            } => {
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(concurrency, Some(8));
                assert!(fail_on_critical);
                assert_eq!(Severity::from(min_severity), Severity::Critical);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_generate() -> Result<()> {
        let args = Cli::parse_from(["qualis", "generate", "--infer-roles"]);
        match args.command {
            Commands::Generate {
                data_dir,
                prune,
                infer_roles,
            } => {
                assert_eq!(data_dir, "data");
                assert!(!prune);
                assert!(infer_roles);
                Ok(())
            }
            _ => bail!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_strict() -> Result<()> {
        let args = Cli::parse_from(["qualis", "validate", "--strict"]);
        match args.command {
            Commands::Validate { strict } => {
                assert!(strict);
                Ok(())
            }
            _ => bail!("Expected Validate command"),
        }
    }
}
