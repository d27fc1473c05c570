//! # Engine Module
//!
//! The batch orchestration core: everything between parsed inputs and finished
//! prediction jobs.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Explicit batch, output layout, affinity and engine settings
//! - **Error Handling** ([`error`]) - Per-task reconciliation errors and whole-batch engine errors
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Reconciliation** ([`reconcile`]) - Aligning an MSA query with each variant, with an on-disk cache
//! - **Enumeration** ([`tasks`]) - Lazy variant × ligand cross product over matched sequence files
//! - **Job Building** ([`job`]) - Deterministic job identities and job configuration records
//! - **External Engine** ([`runner`]) - The prediction engine seam and its subprocess implementation
//! - **Execution** ([`executor`]) - Sequential, fault-isolating execution with an aggregate report
//!
//! Tasks run strictly one after another; each engine invocation blocks until the
//! engine exits and no timeout is imposed.

pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod progress;
pub mod reconcile;
pub mod runner;
pub mod tasks;
