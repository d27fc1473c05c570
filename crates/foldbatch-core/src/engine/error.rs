use super::config::ConfigError;
use crate::core::io::error::RecordError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single reconciliation; contained at the task boundary.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Alignment '{path}' could not be read: {source}", path = path.display())]
    MissingAlignment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Alignment '{path}' contains no records", path = path.display())]
    EmptyAlignment { path: PathBuf },

    #[error("Failed to write corrected alignment '{path}': {source}", path = path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures that stop a whole batch, workflow or benchmark.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No sequence files (*.fasta, *.fa) found in '{}'", .0.display())]
    NoSequenceFiles(PathBuf),

    #[error("No valid tasks found: no sequence record could be paired with an alignment")]
    NoTasks,

    #[error("Failed to scan input directory '{path}': {source}", path = path.display())]
    InputDiscovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}", path = path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    #[error("Failed to create output directory '{path}': {source}", path = path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write job configuration '{path}': {source}", path = path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize job configuration for '{job}': {source}")]
    Serialization {
        job: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to launch prediction engine '{program}': {source}")]
    EngineLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Saturation mutagenesis failed: {0}")]
    Mutation(String),

    #[error("Benchmark run '{label}' failed: {diagnostic}")]
    BenchmarkRun { label: String, diagnostic: String },

    #[error("Failed to write timing table: {0}")]
    TimingTable(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
