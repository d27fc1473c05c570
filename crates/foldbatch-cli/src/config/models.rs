use foldbatch::engine::config::EngineConfig;
use std::path::PathBuf;

/// Resolved settings for the `benchmark` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub job_config: PathBuf,
    pub out_dir: PathBuf,
    pub engine: EngineConfig,
}
