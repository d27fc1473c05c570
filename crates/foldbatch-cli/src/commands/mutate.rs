use crate::cli::MutateArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use foldbatch::workflows;
use tracing::info;

pub fn run(args: MutateArgs) -> Result<()> {
    let positions = parser::parse_positions(&args.positions)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    info!("Saturating positions {:?} of {:?}", positions, args.fasta);

    let summary = workflows::mutate::run(&args.fasta, &positions, &args.out_dir)?;

    if !summary.skipped_positions.is_empty() {
        println!(
            "Warning: skipped out-of-range position(s): {:?}",
            summary.skipped_positions
        );
    }
    println!(
        "Generated {} sequences ({} site(s) saturated) in: {}",
        summary.variants_written,
        summary.sites,
        summary.output_path.display()
    );
    Ok(())
}
