//! # Workflows Module
//!
//! High-level entry points that tie the `engine` and `core` layers together.
//!
//! - **Batch Workflow** ([`batch`]) - Discover inputs, enumerate the variant × ligand cross
//!   product and execute every job against the prediction engine.
//! - **Mutagenesis Workflow** ([`mutate`]) - Generate saturation mutagenesis libraries as
//!   multi-record FASTA files ready to feed into a batch.
//! - **Benchmark Workflow** ([`benchmark`]) - Time the prediction engine and break a run
//!   down into fixed overhead, structure sampling and affinity sampling.

pub mod batch;
pub mod benchmark;
pub mod mutate;
