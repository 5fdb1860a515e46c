use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use crate::model::ledger::DuplicatePolicy;

/// Default location of the results document, relative to the working directory.
pub const DEFAULT_RESULTS_FILE: &str = "results/test_results.json";

/// When mutations reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Rewrite the whole file after every mutation
    #[default]
    WriteThrough,
    /// Keep changes in memory until `flush()` or drop
    Deferred,
}

/// Construction parameters for a `ResultsStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub results_file: PathBuf,
    pub persist: PersistMode,
    pub duplicates: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            results_file: PathBuf::from(DEFAULT_RESULTS_FILE),
            persist: PersistMode::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn at(results_file: impl AsRef<Path>) -> Self {
        Self {
            results_file: results_file.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_persist(mut self, persist: PersistMode) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}
