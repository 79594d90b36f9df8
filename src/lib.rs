//! # csiclean
//!
//! Finds and removes the leftover analysis files that SAP2000, ETABS and
//! SAFE write next to their model files.
//!
//! A scan walks a directory tree for model files (`.sdb`, `.edb`, `.fdb`)
//! and, for each one, looks for siblings with the same base name and one of
//! the application's known junk extensions (`.OUT`, `.LOG`, `.Y00`, ...).
//! Deletion is permanent; failures are counted and never abort the batch.

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod engine;
pub mod registry;
pub mod scanner;

pub use cleaner::{delete_all, DeletionOutcome};
pub use common::errors::CleanupError;
pub use engine::Engine;
pub use registry::{Application, ApplicationProfile};
pub use scanner::{scan, CandidateFile, ScanRequest, ScanResults};
