//! # Core Module
//!
//! Fundamental building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Sequence variants and ligands as parsed from input files
//! - **File I/O** ([`io`]) - FASTA, A3M and ligand list readers/writers behind one trait
//! - **Utilities** ([`utils`]) - Identifier sanitization used for job naming

pub mod io;
pub mod models;
pub mod utils;
