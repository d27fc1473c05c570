//! # foldbatch Core Library
//!
//! Batch orchestration for protein structure and affinity prediction jobs run through an
//! external prediction engine (e.g. Boltz).
//!
//! ## Architectural Philosophy
//!
//! The library follows the same three-layer split used throughout the project:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SequenceVariant`, `Ligand`),
//!   line-oriented record I/O for sequence, alignment and ligand files, and identifier
//!   sanitization.
//!
//! - **[`engine`]: The Logic Core.** Alignment reconciliation with an on-disk cache,
//!   lazy cross-product task enumeration, deterministic job identity and configuration
//!   building, the external engine seam and the fault-isolating batch executor.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the engine: running a
//!   whole batch from input directories, generating saturation mutagenesis libraries and
//!   timing the prediction engine.

pub mod core;
pub mod engine;
pub mod workflows;
