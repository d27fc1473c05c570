use crate::cli::RunArgs;
use crate::config::builder::build_batch_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use foldbatch::{
    engine::{executor::FailureStage, progress::ProgressReporter, runner::CommandEngine},
    workflows::{self, batch::BatchSummary},
};
use std::path;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let config = build_batch_config(&args)?;
    info!(
        "Engine: {:?} (launcher: {:?})",
        config.engine.executable, config.engine.launcher
    );
    let engine = CommandEngine::new(config.engine.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting batch prediction...");
    let summary = workflows::batch::run(&config, &engine, &reporter)?;
    print_summary(&summary);

    let output_root =
        path::absolute(&summary.output_root).unwrap_or_else(|_| summary.output_root.clone());
    println!(
        "\nBatch processing complete. Results are in: {}",
        output_root.display()
    );
    Ok(())
}

fn stage_label(stage: FailureStage) -> &'static str {
    match stage {
        FailureStage::Identity => "identity",
        FailureStage::Reconciliation => "alignment",
        FailureStage::Engine => "engine",
    }
}

fn print_summary(summary: &BatchSummary) {
    let report = &summary.report;
    println!(
        "Processed {} job(s) from {} sequence file(s): {} succeeded, {} failed.",
        report.total,
        summary.sequence_files,
        report.succeeded_count(),
        report.failed_count()
    );
    for path in &summary.unmatched {
        println!("  Skipped (no alignment): {}", path.display());
    }
    for path in &summary.unreadable {
        println!("  Skipped (unreadable): {}", path.display());
    }
    for failure in &report.failures {
        println!(
            "  ✗ {} [{}]: {}",
            failure.job,
            stage_label(failure.stage),
            failure.diagnostic
        );
    }
}
