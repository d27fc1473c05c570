//! Provides input/output functionality for the line-oriented record formats used by a batch.
//!
//! Sequence variants are read from FASTA files, pre-computed alignments from A3M files and
//! ligands from `ID: SMILES` lists. All three share the [`traits::RecordFile`] interface so
//! callers can read them from any buffered reader or straight from a path.

pub mod a3m;
pub mod error;
pub mod fasta;
pub mod ligands;
pub mod traits;
