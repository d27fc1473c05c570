use crate::core::io::fasta::FastaFile;
use crate::core::io::traits::RecordFile;
use crate::core::models::variant::SequenceVariant;
use crate::engine::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// The 20 standard amino acids, in the order substitutions are emitted.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V',
    'W', 'Y',
];

const WILD_TYPE_SUFFIX: &str = "WT";
const OUTPUT_SUFFIX: &str = "_saturated.fasta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaturationLibrary {
    /// The wild type first, then every substitution.
    pub variants: Vec<SequenceVariant>,
    /// Distinct in-range positions that were mutated.
    pub sites: Vec<usize>,
    /// Requested positions outside `1..=len`.
    pub skipped_positions: Vec<usize>,
}

impl SaturationLibrary {
    pub fn mutant_count(&self) -> usize {
        self.variants.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationSummary {
    pub output_path: PathBuf,
    pub variants_written: usize,
    pub sites: usize,
    pub skipped_positions: Vec<usize>,
}

/// Builds every single-point substitution of `wild_type` at the 1-based `positions`.
///
/// Mutants are named `{id}_{wt}{pos}{mut}`; the wild type is renamed `{id}_WT`. Positions
/// are processed in the given order, so a repeated position is saturated again.
pub fn saturation_library(wild_type: &SequenceVariant, positions: &[usize]) -> SaturationLibrary {
    let residues: Vec<char> = wild_type.sequence().chars().collect();
    let mut variants = vec![SequenceVariant::new(
        format!("{}_{}", wild_type.id(), WILD_TYPE_SUFFIX),
        wild_type.sequence(),
    )];
    let mut sites = Vec::new();
    let mut skipped_positions = Vec::new();

    for &position in positions {
        if position == 0 || position > residues.len() {
            skipped_positions.push(position);
            continue;
        }
        sites.push(position);

        let index = position - 1;
        let wt_residue = residues[index];
        for &mut_residue in AMINO_ACIDS.iter().filter(|&&aa| aa != wt_residue) {
            let mut mutant = residues.clone();
            mutant[index] = mut_residue;
            variants.push(SequenceVariant::new(
                format!("{}_{}{}{}", wild_type.id(), wt_residue, position, mut_residue),
                mutant.into_iter().collect::<String>(),
            ));
        }
    }

    SaturationLibrary {
        variants,
        sites,
        skipped_positions,
    }
}

/// Writes the saturation library of the first record of `fasta` to
/// `<out_dir>/<stem>_saturated.fasta`.
#[instrument(skip_all, name = "mutate_workflow")]
pub fn run(fasta: &Path, positions: &[usize], out_dir: &Path) -> Result<MutationSummary, EngineError> {
    let records = FastaFile::read_from_path(fasta).map_err(|e| EngineError::Record {
        path: fasta.to_path_buf(),
        source: e,
    })?;
    let wild_type = records
        .first()
        .ok_or_else(|| EngineError::Mutation(format!("{:?} contains no sequence record", fasta)))?;
    if records.len() > 1 {
        warn!(
            "{:?} holds {} records; only the first ('{}') is mutated.",
            fasta,
            records.len(),
            wild_type.id()
        );
    }

    let library = saturation_library(wild_type, positions);
    for position in &library.skipped_positions {
        warn!(
            "Position {} is out of range (1-{}). Skipping.",
            position,
            wild_type.len()
        );
    }

    fs::create_dir_all(out_dir).map_err(|e| EngineError::OutputDirectory {
        path: out_dir.to_path_buf(),
        source: e,
    })?;
    let stem = fasta
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| wild_type.id().to_string());
    let output_path = out_dir.join(format!("{}{}", stem, OUTPUT_SUFFIX));
    FastaFile::write_to_path(&library.variants, &output_path).map_err(|e| {
        EngineError::Record {
            path: output_path.clone(),
            source: e,
        }
    })?;

    info!(
        "Generated {} variants at {} sites into {:?}.",
        library.mutant_count(),
        library.sites.len(),
        &output_path
    );
    Ok(MutationSummary {
        output_path,
        variants_written: library.mutant_count(),
        sites: library.sites.len(),
        skipped_positions: library.skipped_positions,
    })
}
