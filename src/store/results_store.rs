use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{Result, ResultsError};
use crate::model::document::{ResultsDocument, StoreSummary};
use crate::model::ledger::SuiteLedger;
use crate::model::record::{ResultRecord, TestStatus, local_timestamp};
use crate::store::config::{PersistMode, StoreConfig};

// ============================================================================
// Results store — the persisted, shared sink for test results
// ============================================================================

/// In-memory `ResultsDocument` bound to a JSON file.
///
/// No operation except the `try_*` variants returns an error: I/O and
/// parse failures are logged and the in-memory state stays usable, so a
/// broken results file never aborts a test run.
///
/// Single writer only. Two processes sharing one file race, and the last
/// save wins.
#[derive(Debug)]
pub struct ResultsStore {
    config: StoreConfig,
    document: ResultsDocument,
    dirty: bool,
}

impl ResultsStore {
    /// Load the configured file, or start empty if it is absent or unreadable.
    pub fn open(config: StoreConfig) -> Self {
        let document = match load_document(&config.results_file) {
            Ok(Some(doc)) => {
                debug!(
                    path = %config.results_file.display(),
                    suites = doc.test_suites.len(),
                    "loaded existing results"
                );
                doc
            }
            Ok(None) => ResultsDocument::new(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable results file, starting empty");
                ResultsDocument::new()
            }
        };

        Self {
            config,
            document,
            dirty: false,
        }
    }

    /// Shorthand for `open(StoreConfig::at(path))`.
    pub fn open_path(path: impl AsRef<Path>) -> Self {
        Self::open(StoreConfig::at(path))
    }

    /// Register a suite. An existing suite is left untouched.
    pub fn add_suite(&mut self, name: &str, metadata: Map<String, Value>) {
        if self.document.ensure_suite(name, metadata) {
            debug!(suite = name, "suite created");
            self.document.recompute_summary(&local_timestamp());
            self.mutated();
        }
    }

    /// Record one test result and persist according to the configured mode.
    pub fn add_test(
        &mut self,
        suite: &str,
        test_id: &str,
        test_name: &str,
        status: TestStatus,
        duration: f64,
        details: &str,
    ) -> ResultRecord {
        let now = local_timestamp();
        let record = self
            .document
            .record(
                suite,
                test_id,
                test_name,
                status,
                duration,
                details,
                self.config.duplicates,
                &now,
            )
            .clone();
        self.document.recompute_summary(&now);
        debug!(suite, test_id, status = %status, "recorded test result");
        self.mutated();
        record
    }

    /// Write the whole document to disk, logging instead of failing.
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            error!(error = %e, "failed to save results");
        }
    }

    /// Write the whole document to disk.
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// the target, so readers never observe a half-written file.
    pub fn try_save(&mut self) -> Result<()> {
        let path = self.config.results_file.clone();
        write_document(&path, &self.document)?;
        self.dirty = false;
        info!(path = %path.display(), "results saved");
        Ok(())
    }

    /// Save if there are unsaved mutations.
    pub fn flush(&mut self) {
        if self.dirty {
            self.save();
        }
    }

    /// Drop every suite and persist the empty document.
    pub fn clear(&mut self) {
        self.document = ResultsDocument::new();
        self.document.recompute_summary(&local_timestamp());
        info!(path = %self.config.results_file.display(), "results cleared");
        self.mutated();
    }

    fn mutated(&mut self) {
        self.dirty = true;
        if self.config.persist == PersistMode::WriteThrough {
            self.save();
        }
    }

    pub fn document(&self) -> &ResultsDocument {
        &self.document
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteLedger> {
        self.document.suite(name)
    }

    pub fn summary(&self) -> &StoreSummary {
        &self.document.summary
    }

    pub fn all_tests_flat(&self) -> Vec<&ResultRecord> {
        self.document.all_tests_flat()
    }

    pub fn path(&self) -> &Path {
        &self.config.results_file
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Drop for ResultsStore {
    fn drop(&mut self) {
        self.flush();
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Read a results document. `Ok(None)` when the file does not exist.
pub fn load_document(path: &Path) -> Result<Option<ResultsDocument>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ResultsError::io(path, e)),
    };
    let doc = serde_json::from_str(&content).map_err(|e| ResultsError::json(path, e))?;
    Ok(Some(doc))
}

/// Serialize `doc` as pretty JSON and atomically replace `path`.
pub fn write_document(path: &Path, doc: &ResultsDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| ResultsError::json(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ResultsError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(|e| ResultsError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ResultsError::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "test_results.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
