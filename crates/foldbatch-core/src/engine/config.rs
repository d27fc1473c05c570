use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ENGINE_EXECUTABLE: &str = "boltz";

const CONFIG_SUBDIR: &str = "configs";
const PREDICTIONS_SUBDIR: &str = "predictions";
const CORRECTED_MSA_SUBDIR: &str = "corrected_msa";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub sequence_dir: PathBuf,
    pub alignment_dir: PathBuf,
    pub ligand_file: Option<PathBuf>,
}

/// Directory tree a batch writes into, rooted at the user-chosen output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_SUBDIR)
    }

    pub fn predict_dir(&self) -> PathBuf {
        self.root.join(PREDICTIONS_SUBDIR)
    }

    pub fn corrected_msa_dir(&self) -> PathBuf {
        self.root.join(CORRECTED_MSA_SUBDIR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinityConfig {
    pub samples: u32,
}

/// How the external prediction engine is launched.
///
/// A non-empty `launcher` is a command prefix placed before the executable, e.g.
/// `["mamba", "run", "-n", "boltz"]` to run the engine inside a conda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub executable: PathBuf,
    pub launcher: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_ENGINE_EXECUTABLE),
            launcher: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub inputs: InputConfig,
    pub outputs: OutputLayout,
    pub affinity: Option<AffinityConfig>,
    pub engine: EngineConfig,
}

impl BatchConfig {
    pub fn execution_settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            config_dir: self.outputs.config_dir(),
            predict_dir: self.outputs.predict_dir(),
            cache_dir: self.outputs.corrected_msa_dir(),
            affinity: self.affinity,
        }
    }
}

/// The subset of a [`BatchConfig`] the executor needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSettings {
    pub config_dir: PathBuf,
    pub predict_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub affinity: Option<AffinityConfig>,
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    sequence_dir: Option<PathBuf>,
    alignment_dir: Option<PathBuf>,
    ligand_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    affinity_samples: Option<u32>,
    engine: Option<EngineConfig>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence_dir(mut self, path: PathBuf) -> Self {
        self.sequence_dir = Some(path);
        self
    }
    pub fn alignment_dir(mut self, path: PathBuf) -> Self {
        self.alignment_dir = Some(path);
        self
    }
    pub fn ligand_file(mut self, path: Option<PathBuf>) -> Self {
        self.ligand_file = path;
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    /// Requests affinity prediction with the given number of diffusion samples.
    pub fn affinity_samples(mut self, samples: Option<u32>) -> Self {
        self.affinity_samples = samples;
        self
    }
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let inputs = InputConfig {
            sequence_dir: self
                .sequence_dir
                .ok_or(ConfigError::MissingParameter("sequence_dir"))?,
            alignment_dir: self
                .alignment_dir
                .ok_or(ConfigError::MissingParameter("alignment_dir"))?,
            ligand_file: self.ligand_file,
        };
        let outputs = OutputLayout::new(
            self.output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
        );

        let affinity = match self.affinity_samples {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    parameter: "affinity_samples",
                    reason: "at least one diffusion sample is required".to_string(),
                });
            }
            Some(samples) => Some(AffinityConfig { samples }),
            None => None,
        };

        let engine = self.engine.unwrap_or_default();
        if engine.executable.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "engine.executable",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(BatchConfig {
            inputs,
            outputs,
            affinity,
            engine,
        })
    }
}
