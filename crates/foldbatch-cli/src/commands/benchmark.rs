use crate::cli::BenchmarkArgs;
use crate::config::builder::build_benchmark_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use foldbatch::{
    engine::{progress::ProgressReporter, runner::CommandEngine},
    workflows::{self, benchmark::BenchmarkReport},
};
use tracing::info;

/// Affinity sample count used for the reported time shares.
const REPORTED_AFFINITY_SAMPLES: u32 = 5;

pub fn run(args: BenchmarkArgs) -> Result<()> {
    let config = build_benchmark_config(&args)?;
    let engine = CommandEngine::new(config.engine.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Benchmarking {}...", config.job_config.display());
    info!("Benchmark output directory: {:?}", config.out_dir);
    let report = workflows::benchmark::run(&engine, &config.job_config, &config.out_dir, &reporter)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BenchmarkReport) {
    println!("\nRun timings:");
    for record in &report.records {
        let affinity = record
            .affinity_samples
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "  {:<4} diffusion={:<3} affinity={:<3} {:>9.2}s",
            record.label, record.diffusion_samples, affinity, record.seconds
        );
    }

    let breakdown = &report.breakdown;
    println!("\nDerived costs:");
    println!("  Fixed overhead:          {:>9.2}s", breakdown.fixed_overhead);
    println!("  Per structure sample:    {:>9.2}s", breakdown.per_structure_sample);
    println!("  Per affinity sample:     {:>9.2}s", breakdown.per_affinity_sample);

    println!(
        "\nTime share (1 structure sample, {} affinity samples):",
        REPORTED_AFFINITY_SAMPLES
    );
    for (label, percent) in breakdown.shares(REPORTED_AFFINITY_SAMPLES) {
        println!("  {:<22} {:>5.1}%", label, percent);
    }
    println!("\nTimings written to: {}", report.timings_path.display());
}
