use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{PredictionEngine, PredictionRequest};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

const TIMINGS_FILE: &str = "timings.csv";
/// Shares below this many seconds are clamped so timing noise cannot produce negatives.
const MIN_SHARE_SECONDS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkScenario {
    pub label: &'static str,
    pub diffusion_samples: u32,
    pub affinity_samples: Option<u32>,
}

/// Structure-only runs with 1 and 5 samples, then 1 structure sample with 5 and 10
/// affinity samples. [`TimingBreakdown::from_timings`] relies on this order.
pub const STANDARD_SCENARIOS: [BenchmarkScenario; 4] = [
    BenchmarkScenario {
        label: "t1",
        diffusion_samples: 1,
        affinity_samples: None,
    },
    BenchmarkScenario {
        label: "t2",
        diffusion_samples: 5,
        affinity_samples: None,
    },
    BenchmarkScenario {
        label: "t3",
        diffusion_samples: 1,
        affinity_samples: Some(5),
    },
    BenchmarkScenario {
        label: "t4",
        diffusion_samples: 1,
        affinity_samples: Some(10),
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRecord {
    pub label: String,
    pub diffusion_samples: u32,
    pub affinity_samples: Option<u32>,
    pub seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingBreakdown {
    pub fixed_overhead: f64,
    pub per_structure_sample: f64,
    pub per_affinity_sample: f64,
}

impl TimingBreakdown {
    /// Derives per-sample costs from the wall times of [`STANDARD_SCENARIOS`].
    pub fn from_timings(timings: [f64; 4]) -> Self {
        let [t1, t2, t3, t4] = timings;
        let per_structure_sample = (t2 - t1) / 4.0;
        let per_affinity_sample = (t4 - t3) / 5.0;
        Self {
            fixed_overhead: t1 - per_structure_sample,
            per_structure_sample,
            per_affinity_sample,
        }
    }

    /// Percentage of a 1-structure-sample run spent in overhead, structure and affinity
    /// sampling, for the given number of affinity samples.
    pub fn shares(&self, affinity_samples: u32) -> [(&'static str, f64); 3] {
        let parts = [
            ("Overhead", self.fixed_overhead),
            ("Structure Prediction", self.per_structure_sample),
            (
                "Affinity Prediction",
                self.per_affinity_sample * f64::from(affinity_samples),
            ),
        ]
        .map(|(label, seconds)| (label, seconds.max(MIN_SHARE_SECONDS)));
        let total: f64 = parts.iter().map(|(_, s)| s).sum();
        parts.map(|(label, seconds)| (label, 100.0 * seconds / total))
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub records: Vec<TimingRecord>,
    pub breakdown: TimingBreakdown,
    pub timings_path: PathBuf,
}

/// Times `scenarios` one after another; the first failing run aborts the benchmark.
pub fn run_scenarios<E: PredictionEngine>(
    engine: &E,
    job_config: &Path,
    out_dir: &Path,
    scenarios: &[BenchmarkScenario],
    reporter: &ProgressReporter,
) -> Result<Vec<TimingRecord>, EngineError> {
    let mut records = Vec::with_capacity(scenarios.len());
    reporter.report(Progress::TaskStart {
        total_steps: scenarios.len() as u64,
    });

    for (i, scenario) in scenarios.iter().enumerate() {
        reporter.report(Progress::StatusUpdate {
            text: format!("[{}/{}] {}", i + 1, scenarios.len(), scenario.label),
        });
        let run_dir = out_dir.join(scenario.label);
        let request = PredictionRequest::new(job_config, &run_dir)
            .with_diffusion_samples(Some(scenario.diffusion_samples))
            .with_affinity_samples(scenario.affinity_samples)
            .with_override(true);

        let start = Instant::now();
        let outcome = engine.predict(&request)?;
        let seconds = start.elapsed().as_secs_f64();
        if !outcome.success {
            return Err(EngineError::BenchmarkRun {
                label: scenario.label.to_string(),
                diagnostic: outcome.diagnostic(),
            });
        }

        info!("Scenario '{}' took {:.2}s.", scenario.label, seconds);
        records.push(TimingRecord {
            label: scenario.label.to_string(),
            diffusion_samples: scenario.diffusion_samples,
            affinity_samples: scenario.affinity_samples,
            seconds,
        });
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    Ok(records)
}

/// Runs [`STANDARD_SCENARIOS`] and writes `timings.csv` into `out_dir`.
#[instrument(skip_all, name = "benchmark_workflow")]
pub fn run<E: PredictionEngine>(
    engine: &E,
    job_config: &Path,
    out_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<BenchmarkReport, EngineError> {
    fs::create_dir_all(out_dir).map_err(|e| EngineError::OutputDirectory {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    reporter.report(Progress::PhaseStart {
        name: "Benchmarking engine",
    });
    let records = run_scenarios(engine, job_config, out_dir, &STANDARD_SCENARIOS, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let timings_path = out_dir.join(TIMINGS_FILE);
    write_timings(&records, &timings_path)?;

    let mut timings = [0.0; 4];
    for (slot, record) in timings.iter_mut().zip(&records) {
        *slot = record.seconds;
    }
    Ok(BenchmarkReport {
        records,
        breakdown: TimingBreakdown::from_timings(timings),
        timings_path,
    })
}

fn write_timings(records: &[TimingRecord], path: &Path) -> Result<(), EngineError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
