pub mod executor;

pub use executor::{delete_all, delete_all_with, DeletionFailure, DeletionOutcome};
