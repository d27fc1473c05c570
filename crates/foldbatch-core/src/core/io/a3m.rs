use super::error::RecordError;
use super::traits::RecordFile;
use std::io::{BufRead, Write};

const HEADER_MARKER: char = '>';
const GAP_CHARS: [char; 2] = ['-', '.'];

/// A parsed A3M alignment, split around its query record.
///
/// Only the query record is interpreted. Everything before it (e.g. `#` comment
/// lines) and everything from the second record onward is kept as raw text so
/// that a rewritten alignment differs from its source in the query row only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A3mAlignment {
    preamble: String,
    query_header: String,
    query_sequence: String,
    remainder: String,
}

impl A3mAlignment {
    /// The query header line without its line terminator, marker included.
    pub fn query_header(&self) -> &str {
        &self.query_header
    }

    /// The query row as stored, gaps included.
    pub fn query_sequence(&self) -> &str {
        &self.query_sequence
    }

    /// The query row with gap characters (`-`, `.`) removed.
    pub fn ungapped_query(&self) -> String {
        self.query_sequence
            .chars()
            .filter(|c| !GAP_CHARS.contains(c))
            .collect()
    }

    /// Whether the ungapped query is byte-for-byte equal to `sequence`.
    pub fn query_matches(&self, sequence: &str) -> bool {
        self.ungapped_query() == sequence
    }

    /// Raw text of every record after the query.
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// Returns a copy with the query row replaced by `sequence`; header, preamble and all
    /// other records are carried over untouched.
    pub fn with_query(&self, sequence: &str) -> Self {
        Self {
            preamble: self.preamble.clone(),
            query_header: self.query_header.clone(),
            query_sequence: sequence.to_string(),
            remainder: self.remainder.clone(),
        }
    }
}

pub struct A3mFile;

impl RecordFile for A3mFile {
    type Content = A3mAlignment;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut preamble = String::new();
        let mut query_header: Option<String> = None;
        let mut query_sequence = String::new();
        let mut remainder_start = text.len();
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let is_header = line.starts_with(HEADER_MARKER);
            match (&query_header, is_header) {
                (None, false) => preamble.push_str(line),
                (None, true) => query_header = Some(line.trim_end().to_string()),
                (Some(_), false) => query_sequence.push_str(line.trim()),
                (Some(_), true) => {
                    remainder_start = offset;
                    break;
                }
            }
            offset += line.len();
        }

        let query_header = query_header.ok_or(RecordError::MissingRecord("query"))?;
        Ok(A3mAlignment {
            preamble,
            query_header,
            query_sequence,
            remainder: text[remainder_start..].to_string(),
        })
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        writer.write_all(content.preamble.as_bytes())?;
        writeln!(writer, "{}", content.query_header)?;
        writeln!(writer, "{}", content.query_sequence)?;
        writer.write_all(content.remainder.as_bytes())?;
        Ok(())
    }
}
