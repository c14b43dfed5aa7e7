mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use fconvert::conversion::{self, ConversionRequest, ConversionSettings};
use fconvert::progress;
use fconvert_av::convert;
use fconvert_av::tools;
use fconvert_common::TargetFormat;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on the
    // verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "fconvert=debug,fconvert_av=debug,fconvert_common=debug".to_string()
        } else {
            "fconvert=info,fconvert_av=info,fconvert_common=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.version {
        println!("fconvert {}", env!("CARGO_PKG_VERSION"));
    }

    // The format and at least one file are required; --version alone does
    // not excuse their absence.
    let (format, files) = match (cli.format, cli.files) {
        (Some(format), files) if !files.is_empty() => (format, files),
        _ => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "a target format and at least one file are required",
            )
            .exit(),
    };

    let format = TargetFormat::from(format.as_str());

    if cli.verbose {
        let info = tools::check_tool(convert::program_for(&format));
        if info.available {
            tracing::debug!(
                "using {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!(
                "{} not found on PATH; conversions will fail until it is installed",
                info.name
            );
        }
    }

    let settings = Arc::new(ConversionSettings {
        output_dir: cli.out,
        force: cli.force,
        cleanup_source: cli.cleanup,
        verbose: cli.verbose,
        show_progress: cli.progress,
        max_concurrency: cli.jobs,
    });

    let requests: Vec<ConversionRequest> = files
        .into_iter()
        .map(|source| ConversionRequest {
            source,
            format: format.clone(),
        })
        .collect();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(requests, settings));

    // Per-file failures were reported as they happened; they do not change
    // the process exit code.
    Ok(())
}

async fn run(requests: Vec<ConversionRequest>, settings: Arc<ConversionSettings>) {
    let reporter = progress::reporter_for(&settings, requests.len() as u64);
    let outcomes = conversion::run_all(requests, settings, reporter).await;
    tracing::debug!("{} outcomes recorded", outcomes.len());
}
