use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "foldbatch - Automated batch structure and affinity prediction for protein variants and ligands.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict every sequence variant (and variant × ligand pair) found in the input directories.
    Run(RunArgs),
    /// Generate a saturation mutagenesis library from a FASTA file.
    Mutate(MutateArgs),
    /// Time the prediction engine on a single job configuration.
    Benchmark(BenchmarkArgs),
}

/// Options controlling how the prediction engine is launched.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Prediction engine executable (default: 'boltz').
    #[arg(long = "engine", value_name = "PATH")]
    pub executable: Option<PathBuf>,

    /// Command prefix used to launch the engine, e.g. "mamba run -n boltz".
    #[arg(long, value_name = "COMMAND")]
    pub launcher: Option<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Inputs ---
    /// Directory containing the sequence files (*.fasta, *.fa).
    #[arg(long, alias = "fasta_dir", required = true, value_name = "DIR")]
    pub fasta_dir: PathBuf,

    /// Directory containing the pre-computed alignments (*.a3m).
    #[arg(long, alias = "a3m_dir", required = true, value_name = "DIR")]
    pub a3m_dir: PathBuf,

    /// Optional file with one 'ID: SMILES' ligand per line.
    #[arg(long, value_name = "PATH")]
    pub smiles: Option<PathBuf>,

    /// Final output directory (configs/, predictions/ and corrected_msa/ are created inside).
    #[arg(short, long, alias = "out_dir", required = true, value_name = "DIR")]
    pub out_dir: PathBuf,

    // --- Affinity ---
    /// Enable affinity prediction for ligands.
    #[arg(long, alias = "predict_affinity")]
    pub predict_affinity: bool,

    /// Number of diffusion samples for affinity prediction (default: 5).
    #[arg(long, alias = "affinity_samples", value_name = "INT")]
    pub affinity_samples: Option<u32>,

    // --- Configuration ---
    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S affinity.samples=10
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `mutate` subcommand.
#[derive(Args, Debug)]
pub struct MutateArgs {
    /// Input FASTA file; its first record is the wild type.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fasta: PathBuf,

    /// Comma-separated 1-based positions to saturate (e.g. '10,25,100').
    #[arg(short, long, required = true, value_name = "LIST")]
    pub positions: String,

    /// Output directory for the generated FASTA.
    #[arg(short, long, alias = "out_dir", required = true, value_name = "DIR")]
    pub out_dir: PathBuf,
}

/// Arguments for the `benchmark` subcommand.
#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Job configuration (YAML) to run repeatedly.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving one output directory per run and timings.csv.
    #[arg(short, long, alias = "out_dir", required = true, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_underscore_flag_spellings() {
        let cli = Cli::try_parse_from([
            "foldbatch",
            "run",
            "--fasta_dir",
            "fasta",
            "--a3m_dir",
            "msa",
            "--out_dir",
            "out",
            "--predict_affinity",
            "--affinity_samples",
            "8",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.fasta_dir, PathBuf::from("fasta"));
        assert_eq!(args.a3m_dir, PathBuf::from("msa"));
        assert!(args.predict_affinity);
        assert_eq!(args.affinity_samples, Some(8));
        assert_eq!(args.smiles, None);
    }

    #[test]
    fn run_parses_engine_and_set_overrides() {
        let cli = Cli::try_parse_from([
            "foldbatch",
            "-vv",
            "run",
            "--fasta-dir",
            "f",
            "--a3m-dir",
            "a",
            "-o",
            "out",
            "--engine",
            "/opt/boltz/bin/boltz",
            "--launcher",
            "mamba run -n boltz",
            "-S",
            "affinity.samples=3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(
            args.engine.executable,
            Some(PathBuf::from("/opt/boltz/bin/boltz"))
        );
        assert_eq!(args.engine.launcher.as_deref(), Some("mamba run -n boltz"));
        assert_eq!(args.set_values, vec!["affinity.samples=3"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "foldbatch", "-q", "-v", "mutate", "-f", "x.fasta", "-p", "1", "-o", "out",
        ]);
        assert!(result.is_err());
    }
}
