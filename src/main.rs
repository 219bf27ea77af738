use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use carneades::{Case, CaseFile, GraphExport};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

/// Evaluate argumentation case files under the Carneades model
#[derive(Debug, Parser)]
#[command(name = "carneades", version)]
struct Cli {
    /// Case files (JSON) to evaluate
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Resolve each issue through an adversarial dialogue instead of a
    /// static acceptability query
    #[arg(long)]
    dialogue: bool,

    /// Write the evaluated argument graph as JSON to this path
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        files = cli.files.len(),
        "carneades starting"
    );

    for file in &cli.files {
        info!(path = %file.display(), "processing case file");
        let case = CaseFile::from_path(file)
            .and_then(CaseFile::build)
            .with_context(|| format!("failed to load '{}'", file.display()))?;

        if case.issues.is_empty() {
            warn!(path = %file.display(), "case file declares no issues");
            continue;
        }

        println!("\nprocessing {}", file.display());
        if cli.dialogue {
            run_dialogues(&case, cli.export.as_deref())?;
        } else {
            run_static(&case, cli.export.as_deref())?;
        }
    }

    Ok(())
}

fn run_static(case: &Case, export: Option<&std::path::Path>) -> anyhow::Result<()> {
    let caes = case.caes();
    for issue in &case.issues {
        let acceptable = caes
            .acceptable(issue)
            .with_context(|| format!("failed to evaluate issue '{}'", issue))?;
        println!(
            "\n------ {} {} acceptable ------",
            issue,
            if acceptable { "IS" } else { "IS NOT" }
        );
    }
    if let Some(path) = export {
        write_export(&case.graph.export(), path)?;
    }
    Ok(())
}

fn run_dialogues(case: &Case, export: Option<&std::path::Path>) -> anyhow::Result<()> {
    let engine = case.dialogue();
    for issue in &case.issues {
        let outcome = engine
            .run(issue)
            .with_context(|| format!("dialogue failed for issue '{}'", issue))?;
        println!("\n{}", outcome.trace);
        println!(
            "------ issue '{}' resolved: {} after {} turn(s) ------",
            issue, outcome.resolution, outcome.turns
        );
        if let Some(path) = export {
            write_export(&outcome.graph.export(), path)?;
        }
    }
    Ok(())
}

fn write_export(export: &GraphExport, path: &std::path::Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create export file '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, export)
        .with_context(|| format!("failed to write export '{}'", path.display()))?;
    info!(path = %path.display(), "argument graph exported");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(cli: &Cli) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
