use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileEngineConfig, FileLauncher};
use super::models::BenchmarkConfig;
use crate::cli::{BenchmarkArgs, EngineArgs, RunArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use foldbatch::engine::config::{BatchConfig, BatchConfigBuilder, EngineConfig};
use tracing::debug;

pub fn build_batch_config(args: &RunArgs) -> Result<BatchConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let affinity_file = file_config.affinity.take().unwrap_or_default();
    let predict_affinity = args.predict_affinity
        || affinity_file
            .enabled
            .unwrap_or(defaults.predict_affinity);
    let affinity_samples = args
        .affinity_samples
        .or(affinity_file.samples)
        .unwrap_or(defaults.affinity_samples);

    let engine = resolve_engine(&args.engine, file_config.engine.take(), &defaults)?;

    let config = BatchConfigBuilder::new()
        .sequence_dir(args.fasta_dir.clone())
        .alignment_dir(args.a3m_dir.clone())
        .ligand_file(args.smiles.clone())
        .output_dir(args.out_dir.clone())
        .affinity_samples(predict_affinity.then_some(affinity_samples))
        .engine(engine)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Resolved batch configuration: {:?}", config);
    Ok(config)
}

pub fn build_benchmark_config(args: &BenchmarkArgs) -> Result<BenchmarkConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let engine = resolve_engine(&args.engine, file_config.engine, &defaults)?;

    Ok(BenchmarkConfig {
        job_config: args.input.clone(),
        out_dir: args.out_dir.clone(),
        engine,
    })
}

fn load_file_config(path: Option<&std::path::Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn resolve_engine(
    cli: &EngineArgs,
    file: Option<FileEngineConfig>,
    defaults: &DefaultsConfig,
) -> Result<EngineConfig> {
    let file = file.unwrap_or_default();

    let executable = cli
        .executable
        .clone()
        .or(file.executable)
        .unwrap_or_else(|| defaults.engine_executable.clone());

    let parse_launcher = |command: &str| {
        parser::parse_launcher(command).map_err(|e| CliError::Argument(e.to_string()))
    };
    let launcher = match (cli.launcher.as_deref(), file.launcher) {
        (Some(command), _) => parse_launcher(command)?,
        (None, Some(FileLauncher::Command(command))) => parse_launcher(&command)?,
        (None, Some(FileLauncher::Arguments(arguments))) => arguments,
        (None, None) => defaults.engine_launcher.clone(),
    };

    if executable.as_os_str().is_empty() {
        return Err(CliError::Config(
            "Engine executable cannot be empty.".to_string(),
        ));
    }
    Ok(EngineConfig {
        executable,
        launcher,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = parser::parse_assignment(kv_pair)
            .map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "engine.executable" => {
                config
                    .engine
                    .get_or_insert_with(Default::default)
                    .executable = Some(value_str.into());
            }
            "engine.launcher" => {
                config.engine.get_or_insert_with(Default::default).launcher =
                    Some(FileLauncher::Command(value_str.to_string()));
            }
            "affinity.enabled" => {
                config.affinity.get_or_insert_with(Default::default).enabled =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                    })?);
            }
            "affinity.samples" => {
                config.affinity.get_or_insert_with(Default::default).samples =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                    })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unknown configuration key for --set: {}",
                    key
                )));
            }
        }
    }
    Ok(config)
}
