//! `homeward run` command implementation
//!
//! Builds the configuration bundle, runs the pipeline with ctrl-c wired to
//! cooperative cancellation, prints the summary, and maps the outcome to the
//! process exit status: non-zero when extraction aborted or any loads failed,
//! even though individual record failures never stop the run.

use crate::error::{CliError, Result};
use colored::Colorize;
use homeward_etl::{EtlConfig, Pipeline, PipelineReport};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the ETL pipeline
pub async fn run(
    base_url: String,
    batch_size: usize,
    max_retries: u32,
    timeout_secs: u64,
    dry_run: bool,
    strict_timestamps: bool,
) -> Result<()> {
    // Environment fills the values without CLI flags (retry delays); flags
    // take precedence for everything they cover.
    let mut config = EtlConfig::from_env()?;
    config.base_url = base_url;
    config.batch_size = batch_size;
    config.max_retries = max_retries;
    config.timeout = Duration::from_secs(timeout_secs);
    config.dry_run = dry_run;
    config.strict_timestamps = strict_timestamps;
    config.validate()?;

    if config.dry_run {
        println!(
            "{} Dry run: batches are assembled and counted, nothing is submitted",
            "→".cyan()
        );
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing in-flight work");
            signal_cancel.cancel();
        }
    });

    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(cancel).await;

    print_summary(&report);

    if report.cancelled {
        return Err(CliError::Interrupted);
    }

    if report.aborted {
        return Err(CliError::Aborted);
    }

    if report.stats.load_failed > 0 {
        return Err(CliError::LoadsFailed {
            records: report.stats.load_failed,
            batches: report.stats.batches_failed,
        });
    }

    Ok(())
}

fn print_summary(report: &PipelineReport) {
    let stats = &report.stats;

    println!();
    println!("{}", "ETL summary".bold());
    println!("  extracted:    {}", stats.extracted);
    if stats.detail_failed > 0 {
        println!("  detail skips: {}", stats.detail_failed);
    }
    println!(
        "  transformed:  {} ({} failed)",
        stats.transformed, stats.transform_failed
    );
    println!("  loaded:       {} ({} failed)", stats.loaded, stats.load_failed);
    println!(
        "  batches:      {} submitted, {} failed",
        stats.batches_submitted, stats.batches_failed
    );
    println!("  success rate: {:.1}%", stats.success_rate());
    println!("  duration:     {:.2}s", report.duration.as_secs_f64());

    if report.is_success() {
        let mode = if report.dry_run { " (dry run)" } else { "" };
        println!("\n{} Run completed{}", "✓".green().bold(), mode);
    } else {
        println!("\n{} Run finished with failures", "✗".red().bold());
    }
}
