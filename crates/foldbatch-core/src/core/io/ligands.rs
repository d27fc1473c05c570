use super::error::RecordError;
use super::traits::RecordFile;
use crate::core::models::ligand::Ligand;
use std::io::{BufRead, Write};

const SEPARATOR: char = ':';

/// Ligand lists with one `ID: SMILES` entry per line.
///
/// Lines without a separator (blank lines, free-form notes) are ignored. Only the
/// first separator splits the line, so SMILES containing `:` survive intact.
pub struct LigandFile;

impl RecordFile for LigandFile {
    type Content = Vec<Ligand>;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut ligands = Vec::new();
        for line_res in reader.lines() {
            let line = line_res?;
            let Some((id, smiles)) = line.trim().split_once(SEPARATOR) else {
                continue;
            };
            ligands.push(Ligand::new(id.trim(), smiles.trim()));
        }
        Ok(ligands)
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        for ligand in content {
            writeln!(writer, "{}{} {}", ligand.id(), SEPARATOR, ligand.smiles())?;
        }
        Ok(())
    }
}
