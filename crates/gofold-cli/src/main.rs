mod logging;

use clap::{Parser, Subcommand};
use gofold_config::{GofoldConfig, ModeSetting, OutputFormat};
use gofold_driver::Driver;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gofold")]
#[command(author, version, about = "Constant folding for Go const declarations")]
struct Cli {
    /// Configuration file (defaults to ./gofold.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every constant and print the table
    Eval {
        /// Go source files forming one package
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format (overrides the config file)
        #[arg(long)]
        format: Option<EvalFormat>,

        /// Apply Go's typing rules exactly
        #[arg(long)]
        strict: bool,
    },

    /// Check the files of one package for constant errors
    Check {
        /// Go source files forming one package
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print an intermediate form of a source file
    Dump {
        /// Source file to dump
        file: PathBuf,

        /// What to dump
        #[arg(long, default_value = "hir")]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum EvalFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DumpFormat {
    /// Dump High-level IR
    Hir,
    /// Three-address code with every operation
    Tac,
    /// Three-address code with folded values
    TacFolded,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;
    logging::init_tracing();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().into_diagnostic()?;
    let mut config = GofoldConfig::discover(cli.config.as_deref(), &cwd).into_diagnostic()?;
    tracing::debug!(mode = ?config.evaluator.mode, format = ?config.output.format, "configuration");

    match cli.command {
        Commands::Eval {
            files,
            format,
            strict,
        } => {
            if strict {
                config.evaluator.mode = ModeSetting::Go;
            }
            if let Some(format) = format {
                config.output.format = match format {
                    EvalFormat::Table => OutputFormat::Table,
                    EvalFormat::Json => OutputFormat::Json,
                };
            }
            let driver = Driver::with_config(config);

            let evaluation = driver.evaluate_files(&files)?;
            print!("{}", driver.render(&evaluation)?);
            for diagnostic in &evaluation.diagnostics {
                eprintln!("{:?}", driver.report(diagnostic));
            }

            let errors = evaluation.errors().count();
            if errors > 0 {
                return Err(miette::miette!("{} constant error(s)", errors));
            }
        }

        Commands::Check { files } => {
            let driver = Driver::with_config(config);
            let report = driver.check_files(&files);

            for failure in &report.failures {
                eprintln!("{:?}", failure);
            }
            for diagnostic in &report.evaluation.diagnostics {
                eprintln!("{:?}", driver.report(diagnostic));
            }
            for file in &report.files {
                if file.ok {
                    println!("{}: OK", file.path.display());
                } else {
                    eprintln!("{}: Error", file.path.display());
                }
            }

            let failed = report.failed();
            if failed > 0 {
                return Err(miette::miette!("{} of {} file(s) failed", failed, files.len()));
            }
        }

        Commands::Dump { file, format } => {
            let driver = Driver::with_config(config);

            match format {
                DumpFormat::Hir => {
                    let module = driver.parse_file(&file)?;
                    println!("{:#?}", module);
                }
                DumpFormat::Tac => {
                    print!("{}", driver.tac(&file)?);
                }
                DumpFormat::TacFolded => {
                    let (tac, evaluation) = driver.tac_folded(&file)?;
                    print!("{}", tac);
                    for diagnostic in evaluation.errors() {
                        eprintln!("{:?}", driver.report(diagnostic));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval() {
        let cli = Cli::parse_from(["gofold", "eval", "a.go", "b.go", "--strict", "--format", "json"]);
        match cli.command {
            Commands::Eval {
                files,
                format,
                strict,
            } => {
                assert_eq!(files.len(), 2);
                assert!(matches!(format, Some(EvalFormat::Json)));
                assert!(strict);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_parse_check_takes_package_files() {
        let cli = Cli::parse_from(["gofold", "check", "a.go", "b.go"]);
        match cli.command {
            Commands::Check { files } => {
                assert_eq!(files, [PathBuf::from("a.go"), PathBuf::from("b.go")]);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_dump_tac_folded() {
        let cli = Cli::parse_from(["gofold", "--config", "x.toml", "dump", "a.go", "--format", "tac-folded"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            cli.command,
            Commands::Dump {
                format: DumpFormat::TacFolded,
                ..
            }
        ));
    }
}
