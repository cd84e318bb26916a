//! catalog-audit - catalog consistency auditor
//!
//! Reads the mapping source, generated artifacts and interface files of a
//! project, cross-checks them and prints the report to stdout. Logs go to
//! stderr.
//!
//! Exit status: 0 when the report has no findings, 1 when it has any,
//! 2 when the audit could not run.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use catalog_audit::{render_text, AuditReport, Auditor, TextOptions};
use catalog_common::ConfigResolver;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments for catalog-audit
#[derive(Parser, Debug)]
#[command(name = "catalog-audit")]
#[command(about = "Cross-check catalog mapping blocks, artifacts, interfaces and imports")]
#[command(version)]
struct Args {
    /// Root of the audited project
    #[arg(short, long, env = "CATALOG_AUDIT_ROOT")]
    root: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "CATALOG_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// List the service ids of every category
    #[arg(long)]
    detailed: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Run consistency rules one at a time
    #[arg(long)]
    sequential: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(report) if report.has_findings() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<AuditReport> {
    let (config, config_source) = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting catalog-audit v{} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match config_source.path() {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: compiled defaults"),
    }

    let root = config.resolve_project_root(args.root.as_deref());
    let mut auditor = Auditor::with_root(root, config);
    if args.sequential {
        auditor = auditor.sequential_rules();
    }

    let report = auditor.run().await.context("Audit failed")?;

    let rendered = match args.format {
        OutputFormat::Text => render_text(
            &report,
            &TextOptions {
                detailed: args.detailed,
            },
        ),
        OutputFormat::Json => report.render_json().context("Failed to render report")?,
    };
    print!("{rendered}");
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(report)
}
