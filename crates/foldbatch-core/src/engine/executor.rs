use super::config::ExecutionSettings;
use super::error::EngineError;
use super::job::Job;
use super::progress::{Progress, ProgressReporter};
use super::reconcile::AlignmentCache;
use super::runner::{PredictionEngine, PredictionRequest};
use super::tasks::TaskDescriptor;
use std::collections::HashSet;
use std::fs;
use std::path::{self, Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Lifecycle of a task within one run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Reconciling,
    Configured,
    Running,
    Succeeded,
    Failed,
}

/// The step at which a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The job identity was empty or already used earlier in the run.
    Identity,
    Reconciliation,
    Engine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub job: String,
    pub stage: FailureStage,
    pub diagnostic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub total: usize,
    pub succeeded: Vec<String>,
    pub failures: Vec<JobFailure>,
}

impl ExecutionReport {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.succeeded.len() == self.total
    }
}

enum TaskOutcome {
    Succeeded(String),
    Failed(JobFailure),
}

/// Drives tasks through reconciliation, configuration and the prediction engine.
///
/// Tasks run one at a time in the order given. Each task is attempted at most once and
/// its failure is recorded without affecting later tasks. Only conditions that would
/// fail every remaining task (unwritable configuration directory, engine not
/// launchable) abort the run.
pub struct BatchExecutor<'a, E: PredictionEngine> {
    engine: &'a E,
    settings: &'a ExecutionSettings,
    cache: AlignmentCache,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a, E: PredictionEngine> BatchExecutor<'a, E> {
    pub fn new(
        engine: &'a E,
        settings: &'a ExecutionSettings,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            engine,
            settings,
            cache: AlignmentCache::new(&settings.cache_dir),
            reporter,
        }
    }

    #[instrument(skip_all, name = "batch_executor")]
    pub fn run<'t, I>(&self, tasks: I) -> Result<ExecutionReport, EngineError>
    where
        I: IntoIterator<Item = TaskDescriptor<'t>>,
        I::IntoIter: ExactSizeIterator,
    {
        let tasks = tasks.into_iter();
        let mut report = ExecutionReport {
            total: tasks.len(),
            ..ExecutionReport::default()
        };

        for dir in [&self.settings.config_dir, &self.settings.predict_dir] {
            fs::create_dir_all(dir).map_err(|e| EngineError::OutputDirectory {
                path: dir.clone(),
                source: e,
            })?;
        }

        self.reporter.report(Progress::PhaseStart {
            name: "Running predictions",
        });
        self.reporter.report(Progress::TaskStart {
            total_steps: report.total as u64,
        });

        let mut seen_identities = HashSet::new();
        for task in tasks {
            match self.execute(&task, &mut seen_identities)? {
                TaskOutcome::Succeeded(job) => report.succeeded.push(job),
                TaskOutcome::Failed(failure) => {
                    error!("Job '{}' failed: {}", failure.job, failure.diagnostic);
                    self.reporter.report(Progress::Message(format!(
                        "!!! Error in {}: {}",
                        failure.job, failure.diagnostic
                    )));
                    report.failures.push(failure);
                }
            }
            self.reporter.report(Progress::TaskIncrement);
        }

        self.reporter.report(Progress::TaskFinish);
        self.reporter.report(Progress::PhaseFinish);
        info!(
            "Batch finished: {} total, {} succeeded, {} failed.",
            report.total,
            report.succeeded_count(),
            report.failed_count()
        );
        Ok(report)
    }

    fn execute(
        &self,
        task: &TaskDescriptor<'_>,
        seen_identities: &mut HashSet<String>,
    ) -> Result<TaskOutcome, EngineError> {
        let identity = task.job_identity();
        transition(&identity, TaskState::Pending);
        self.reporter.report(Progress::StatusUpdate {
            text: format!("Processing: {}", identity),
        });

        if identity.is_empty() {
            return Ok(failed(
                format!("{} ({})", task.variant.id(), task.source_file),
                FailureStage::Identity,
                "identifiers sanitize to an empty job name".to_string(),
            ));
        }
        if !seen_identities.insert(identity.clone()) {
            return Ok(failed(
                identity,
                FailureStage::Identity,
                "job name collides with an earlier task in this batch".to_string(),
            ));
        }

        transition(&identity, TaskState::Reconciling);
        let msa = match self.cache.reconcile(task.variant.sequence(), task.alignment) {
            Ok(reconciled) => absolute(reconciled.path()),
            Err(e) => {
                return Ok(failed(identity, FailureStage::Reconciliation, e.to_string()));
            }
        };

        let job = Job::build(task, &msa, self.settings.affinity.is_some());
        let config_path = self.persist(&job)?;
        transition(&identity, TaskState::Configured);

        let out_dir = self.settings.predict_dir.join(job.identity());
        let request = PredictionRequest::new(&config_path, &out_dir)
            .with_affinity_samples(self.settings.affinity.map(|a| a.samples));

        transition(&identity, TaskState::Running);
        let outcome = self.engine.predict(&request)?;
        if outcome.success {
            transition(&identity, TaskState::Succeeded);
            Ok(TaskOutcome::Succeeded(identity))
        } else {
            Ok(failed(identity, FailureStage::Engine, outcome.diagnostic()))
        }
    }

    fn persist(&self, job: &Job) -> Result<PathBuf, EngineError> {
        let path = self.settings.config_dir.join(job.config_file_name());
        let yaml = job
            .configuration()
            .to_yaml()
            .map_err(|e| EngineError::Serialization {
                job: job.identity().to_string(),
                source: e,
            })?;
        fs::write(&path, yaml).map_err(|e| EngineError::ConfigWrite {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

fn transition(job: &str, state: TaskState) {
    debug!(job, ?state, "Task state changed.");
}

fn failed(job: String, stage: FailureStage, diagnostic: String) -> TaskOutcome {
    transition(&job, TaskState::Failed);
    TaskOutcome::Failed(JobFailure {
        job,
        stage,
        diagnostic,
    })
}

fn absolute(path: &Path) -> PathBuf {
    path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
