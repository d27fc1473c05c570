use super::error::RecordError;
use super::traits::RecordFile;
use crate::core::models::variant::SequenceVariant;
use std::io::{BufRead, Write};
use tracing::warn;

const HEADER_MARKER: char = '>';

/// Multi-record FASTA files (e.g. a wild type followed by its saturation variants).
///
/// Sequence lines following a header are concatenated; blank lines are ignored. Lines
/// before the first header and records with an empty identifier are dropped with a
/// warning, leaving the remaining records of the file usable.
/// Sequences are written unwrapped, one line per record.
pub struct FastaFile;

impl RecordFile for FastaFile {
    type Content = Vec<SequenceVariant>;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut variants = Vec::new();
        let mut current: Option<(String, String)> = None;
        // Set while lines belong to no usable record (leading junk or an id-less header).
        let mut discarding = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix(HEADER_MARKER) {
                if let Some((id, sequence)) = current.take() {
                    variants.push(SequenceVariant::new(id, sequence));
                }
                let id = header.trim();
                if id.is_empty() {
                    warn!(
                        "Line {}: record header has an empty identifier; dropping the record.",
                        line_num + 1
                    );
                    discarding = true;
                    continue;
                }
                discarding = false;
                current = Some((id.to_string(), String::new()));
            } else {
                match current.as_mut() {
                    Some((_, sequence)) => sequence.push_str(line),
                    None if !discarding => {
                        warn!(
                            "Line {}: data before the first record header is ignored.",
                            line_num + 1
                        );
                        discarding = true;
                    }
                    None => {}
                }
            }
        }

        if let Some((id, sequence)) = current {
            variants.push(SequenceVariant::new(id, sequence));
        }
        Ok(variants)
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        for variant in content {
            writeln!(writer, "{}{}", HEADER_MARKER, variant.id())?;
            writeln!(writer, "{}", variant.sequence())?;
        }
        Ok(())
    }
}
