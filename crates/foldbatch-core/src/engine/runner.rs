use super::config::EngineConfig;
use super::error::EngineError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Arguments of one `predict` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionRequest<'a> {
    pub config_path: &'a Path,
    pub out_dir: &'a Path,
    pub affinity_samples: Option<u32>,
    pub diffusion_samples: Option<u32>,
    pub override_existing: bool,
}

impl<'a> PredictionRequest<'a> {
    pub fn new(config_path: &'a Path, out_dir: &'a Path) -> Self {
        Self {
            config_path,
            out_dir,
            affinity_samples: None,
            diffusion_samples: None,
            override_existing: false,
        }
    }

    pub fn with_affinity_samples(mut self, samples: Option<u32>) -> Self {
        self.affinity_samples = samples;
        self
    }

    pub fn with_diffusion_samples(mut self, samples: Option<u32>) -> Self {
        self.diffusion_samples = samples;
        self
    }

    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// The engine arguments, starting with the `predict` subcommand.
    pub fn arguments(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "predict".into(),
            self.config_path.into(),
            "--out_dir".into(),
            self.out_dir.into(),
        ];
        if let Some(samples) = self.diffusion_samples {
            args.push("--diffusion_samples".into());
            args.push(samples.to_string().into());
        }
        if self.override_existing {
            args.push("--override".into());
        }
        if let Some(samples) = self.affinity_samples {
            args.push("--diffusion_samples_affinity".into());
            args.push(samples.to_string().into());
        }
        args
    }
}

/// What an engine run reported. A nonzero exit is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutcome {
    /// The engine's error stream, or a description of the exit status if it was silent.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("engine exited with status {}", code),
            None => "engine was terminated by a signal".to_string(),
        }
    }
}

/// The external structure prediction engine.
pub trait PredictionEngine {
    /// Runs one prediction to completion.
    ///
    /// # Errors
    ///
    /// Only for conditions that make every further run pointless, such as the engine
    /// executable not being launchable. Failed predictions are returned as an
    /// unsuccessful [`EngineOutcome`].
    fn predict(&self, request: &PredictionRequest<'_>) -> Result<EngineOutcome, EngineError>;
}

/// Runs the engine as a blocking subprocess, capturing its output.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    config: EngineConfig,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn program(&self) -> OsString {
        match self.config.launcher.first() {
            Some(launcher) => launcher.into(),
            None => self.config.executable.clone().into_os_string(),
        }
    }

    fn command(&self, request: &PredictionRequest<'_>) -> Command {
        let mut command = Command::new(self.program());
        if !self.config.launcher.is_empty() {
            command
                .args(&self.config.launcher[1..])
                .arg(&self.config.executable);
        }
        command.args(request.arguments());
        command
    }
}

impl PredictionEngine for CommandEngine {
    fn predict(&self, request: &PredictionRequest<'_>) -> Result<EngineOutcome, EngineError> {
        let mut command = self.command(request);
        debug!("Running prediction engine: {:?}", &command);

        let output = command.output().map_err(|e| EngineError::EngineLaunch {
            program: self.program().to_string_lossy().into_owned(),
            source: e,
        })?;

        let outcome = EngineOutcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!("Engine finished with {:?}", output.status);
        Ok(outcome)
    }
}
