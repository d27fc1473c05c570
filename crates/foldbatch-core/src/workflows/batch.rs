use crate::core::io::ligands::LigandFile;
use crate::core::io::traits::RecordFile;
use crate::core::models::ligand::Ligand;
use crate::engine::config::BatchConfig;
use crate::engine::error::EngineError;
use crate::engine::executor::{BatchExecutor, ExecutionReport};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::PredictionEngine;
use crate::engine::tasks::{AlignmentIndex, TaskPlan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

const SEQUENCE_EXTENSIONS: [&str; 2] = ["fasta", "fa"];
const ALIGNMENT_EXTENSION: &str = "a3m";

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub report: ExecutionReport,
    pub sequence_files: usize,
    pub unmatched: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    pub output_root: PathBuf,
}

/// The inputs of a batch after directory scanning and ligand parsing.
#[derive(Debug, Clone)]
pub struct DiscoveredInputs {
    pub sequence_files: Vec<PathBuf>,
    pub alignments: AlignmentIndex,
    pub ligands: Vec<Ligand>,
}

/// Runs a complete batch described by `config`.
///
/// # Errors
///
/// Fails before any job runs if the input directories cannot be scanned, no sequence
/// files exist, the ligand file cannot be read, or no task can be enumerated. Once
/// execution starts only hard failures (see [`BatchExecutor`]) are returned; per-job
/// failures end up in the report.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run<E: PredictionEngine>(
    config: &BatchConfig,
    engine: &E,
    reporter: &ProgressReporter,
) -> Result<BatchSummary, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Discovering inputs",
    });
    let inputs = match discover_inputs(config) {
        Ok(inputs) => inputs,
        Err(e) => {
            reporter.report(Progress::PhaseFinish);
            return Err(e);
        }
    };
    let sequence_files = inputs.sequence_files.len();
    let plan = TaskPlan::build(&inputs.sequence_files, &inputs.alignments, inputs.ligands);
    reporter.report(Progress::PhaseFinish);

    for path in plan.unmatched() {
        warn!("No alignment available for {:?}; its records are skipped.", path);
    }
    if plan.is_empty() {
        return Err(EngineError::NoTasks);
    }

    info!(
        "Found {} prediction tasks across {} files.",
        plan.len(),
        sequence_files
    );
    reporter.report(Progress::Message(format!(
        "Found {} prediction tasks across {} files.",
        plan.len(),
        sequence_files
    )));

    let settings = config.execution_settings();
    let executor = BatchExecutor::new(engine, &settings, reporter);
    let report = executor.run(plan.tasks())?;

    Ok(BatchSummary {
        report,
        sequence_files,
        unmatched: plan.unmatched().to_vec(),
        unreadable: plan.unreadable().to_vec(),
        output_root: config.outputs.root().to_path_buf(),
    })
}

/// Scans the input directories and reads the ligand list.
pub fn discover_inputs(config: &BatchConfig) -> Result<DiscoveredInputs, EngineError> {
    let sequence_dir = &config.inputs.sequence_dir;
    let sequence_files = list_files(sequence_dir, &SEQUENCE_EXTENSIONS)?;
    if sequence_files.is_empty() {
        return Err(EngineError::NoSequenceFiles(sequence_dir.clone()));
    }

    let alignments =
        AlignmentIndex::from_paths(list_files(&config.inputs.alignment_dir, &[ALIGNMENT_EXTENSION])?);
    if alignments.is_empty() {
        warn!(
            "No alignment files found in {:?}.",
            &config.inputs.alignment_dir
        );
    }

    let ligands = match &config.inputs.ligand_file {
        Some(path) => LigandFile::read_from_path(path).map_err(|e| EngineError::Record {
            path: path.clone(),
            source: e,
        })?,
        None => Vec::new(),
    };

    Ok(DiscoveredInputs {
        sequence_files,
        alignments,
        ligands,
    })
}

/// Regular files in `dir` with one of `extensions`, sorted by file name.
fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, EngineError> {
    let discovery = |e| EngineError::InputDiscovery {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery)? {
        let path = entry.map_err(discovery)?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::BatchConfigBuilder;
    use crate::engine::executor::FailureStage;
    use crate::engine::runner::{EngineOutcome, PredictionRequest};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingEngine {
        jobs: Mutex<Vec<String>>,
    }

    impl PredictionEngine for RecordingEngine {
        fn predict(&self, request: &PredictionRequest<'_>) -> Result<EngineOutcome, EngineError> {
            let job = request.out_dir.file_name().unwrap().to_string_lossy().into_owned();
            let success = !job.contains("bad");
            self.jobs.lock().unwrap().push(job);
            Ok(EngineOutcome {
                success,
                exit_code: Some(if success { 0 } else { 1 }),
                stdout: String::new(),
                stderr: "failure".to_string(),
            })
        }
    }

    struct TestSetup {
        temp_dir: TempDir,
    }

    impl TestSetup {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir_all(temp_dir.path().join("fasta")).unwrap();
            fs::create_dir_all(temp_dir.path().join("a3m")).unwrap();
            Self { temp_dir }
        }

        fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.temp_dir.path().join(relative);
            fs::write(&path, content).unwrap();
            path
        }

        fn config(&self, ligand_file: Option<PathBuf>) -> BatchConfig {
            let root = self.temp_dir.path();
            BatchConfigBuilder::new()
                .sequence_dir(root.join("fasta"))
                .alignment_dir(root.join("a3m"))
                .ligand_file(ligand_file)
                .output_dir(root.join("out"))
                .build()
                .unwrap()
        }
    }

    #[test]
    fn run_executes_cross_product_in_discovery_order() {
        let setup = TestSetup::new();
        setup.write("fasta/b.fasta", ">B1\nMKV\n");
        setup.write("fasta/a.fa", ">WT\nACDE\n>WT_A2G\nGCDE\n");
        setup.write("fasta/notes.txt", ">ignored\nAAAA\n");
        setup.write("a3m/shared.a3m", ">101\nACDE\n");
        let ligands = setup.write("ligands.txt", "LIG1: CCO\nLIG2: CCN\n");
        let engine = RecordingEngine::default();

        let summary = run(&setup.config(Some(ligands)), &engine, &ProgressReporter::new()).unwrap();

        assert_eq!(summary.sequence_files, 2);
        assert_eq!(summary.report.total, 6);
        assert!(summary.report.all_succeeded());
        assert_eq!(
            *engine.jobs.lock().unwrap(),
            vec![
                "WT_LIG1",
                "WT_LIG2",
                "WT_A2G_LIG1",
                "WT_A2G_LIG2",
                "B1_LIG1",
                "B1_LIG2"
            ]
        );
        let out = setup.temp_dir.path().join("out");
        assert!(out.join("configs/WT_A2G_LIG2.yaml").is_file());
        assert!(out.join("corrected_msa").is_dir());
    }

    #[test]
    fn run_skips_unmatched_files_when_several_alignments_exist() {
        let setup = TestSetup::new();
        setup.write("fasta/p1.fasta", ">WT\nACDE\n>bad_variant\nGCDE\n");
        setup.write("fasta/p2.fasta", ">X\nMK\n");
        setup.write("a3m/p1.a3m", ">101\nACDE\n");
        setup.write("a3m/p3.a3m", ">101\nMK\n");
        let engine = RecordingEngine::default();

        let summary = run(&setup.config(None), &engine, &ProgressReporter::new()).unwrap();

        assert_eq!(summary.report.total, 2);
        assert_eq!(summary.report.succeeded, vec!["WT"]);
        assert_eq!(summary.report.failures[0].job, "bad_variant");
        assert_eq!(summary.report.failures[0].stage, FailureStage::Engine);
        assert_eq!(summary.unmatched.len(), 1);
        assert!(summary.unmatched[0].ends_with("p2.fasta"));
    }

    #[test]
    fn run_without_sequence_files_fails_fast() {
        let setup = TestSetup::new();
        setup.write("a3m/p1.a3m", ">101\nACDE\n");
        let err = run(&setup.config(None), &RecordingEngine::default(), &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::NoSequenceFiles(_)));
    }

    #[test]
    fn run_without_any_matched_alignment_reports_no_tasks() {
        let setup = TestSetup::new();
        setup.write("fasta/p1.fasta", ">WT\nACDE\n");
        let engine = RecordingEngine::default();
        let err = run(&setup.config(None), &engine, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::NoTasks));
        assert!(engine.jobs.lock().unwrap().is_empty());
    }

    #[test]
    fn run_with_missing_input_directory_is_a_discovery_error() {
        let setup = TestSetup::new();
        fs::remove_dir(setup.temp_dir.path().join("a3m")).unwrap();
        setup.write("fasta/p1.fasta", ">WT\nACDE\n");
        let err = run(&setup.config(None), &RecordingEngine::default(), &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::InputDiscovery { .. }));
    }

    #[test]
    fn run_with_unreadable_ligand_file_fails_fast() {
        let setup = TestSetup::new();
        setup.write("fasta/p1.fasta", ">WT\nACDE\n");
        setup.write("a3m/p1.a3m", ">101\nACDE\n");
        let missing = setup.temp_dir.path().join("missing.txt");
        let err = run(
            &setup.config(Some(missing)),
            &RecordingEngine::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Record { .. }));
    }

    #[test]
    fn discovery_failure_closes_its_progress_phase() {
        let setup = TestSetup::new();
        fs::remove_dir(setup.temp_dir.path().join("fasta")).unwrap();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p| {
            events.lock().unwrap().push(p);
        }));

        let err = run(&setup.config(None), &RecordingEngine::default(), &reporter).unwrap_err();
        drop(reporter);

        assert!(matches!(err, EngineError::InputDiscovery { .. }));
        let events = events.into_inner().unwrap();
        assert!(matches!(
            events.as_slice(),
            [
                Progress::PhaseStart {
                    name: "Discovering inputs"
                },
                Progress::PhaseFinish
            ]
        ));
    }
}
