use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::ledger::{DuplicatePolicy, SuiteLedger, pass_rate};
use crate::model::record::{ResultRecord, TestStatus, lenient_f64, lenient_usize};

// ============================================================================
// Results document — the persisted aggregate of every suite
// ============================================================================

/// Global rollup across all suites.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSummary {
    #[serde(deserialize_with = "lenient_usize")]
    pub total_suites: usize,
    #[serde(deserialize_with = "lenient_usize")]
    pub total_tests: usize,
    #[serde(deserialize_with = "lenient_usize")]
    pub total_passed: usize,
    #[serde(deserialize_with = "lenient_usize")]
    pub total_failed: usize,
    #[serde(deserialize_with = "lenient_f64")]
    pub pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    /// Last mutation of the document
    pub updated: String,
}

/// Serde model of `test_results.json`.
///
/// Unknown top-level keys are ignored on load; missing keys fall back to
/// empty values so a partial file still loads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsDocument {
    /// Keyed by suite name, case-sensitive, iterated in name order
    pub test_suites: BTreeMap<String, SuiteLedger>,
    pub summary: StoreSummary,
    pub metadata: DocumentMetadata,
}

impl ResultsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name` with the given metadata unless it already exists.
    ///
    /// Returns `true` if a new suite was created.
    pub fn ensure_suite(&mut self, name: &str, metadata: Map<String, Value>) -> bool {
        if self.test_suites.contains_key(name) {
            return false;
        }
        self.test_suites
            .insert(name.to_string(), SuiteLedger::new(metadata));
        true
    }

    /// Append a record to `suite`, creating the suite on first use, and
    /// recompute that suite's statistics. The global summary is left to
    /// the caller.
    pub fn record(
        &mut self,
        suite: &str,
        id: &str,
        name: &str,
        status: TestStatus,
        duration: f64,
        details: &str,
        policy: DuplicatePolicy,
        now: &str,
    ) -> &ResultRecord {
        let record = ResultRecord::new(suite, id, name, status, duration, details).with_timestamp(now);
        self.push(record, policy, now)
    }

    /// Append an already-built record to the suite named by `record.suite`.
    pub fn push(&mut self, record: ResultRecord, policy: DuplicatePolicy, now: &str) -> &ResultRecord {
        let ledger = self
            .test_suites
            .entry(record.suite.clone())
            .or_default();
        ledger.push(record, policy, now);
        // push always leaves at least the new record in place
        &ledger.tests[ledger.tests.len() - 1]
    }

    /// Rebuild the global summary from the suite metadata.
    pub fn recompute_summary(&mut self, now: &str) {
        let (mut total_tests, mut total_passed, mut total_failed) = (0usize, 0usize, 0usize);
        for meta in self.test_suites.values().map(|s| &s.metadata) {
            total_tests = total_tests.saturating_add(meta.total);
            total_passed = total_passed.saturating_add(meta.passed);
            total_failed = total_failed.saturating_add(meta.failed);
        }

        self.summary = StoreSummary {
            total_suites: self.test_suites.len(),
            total_tests,
            total_passed,
            total_failed,
            pass_rate: pass_rate(total_passed, total_tests),
        };
        self.metadata.updated = now.to_string();
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteLedger> {
        self.test_suites.get(name)
    }

    /// Every record across all suites, suites in name order.
    pub fn all_tests_flat(&self) -> Vec<&ResultRecord> {
        self.test_suites
            .values()
            .flat_map(|suite| suite.tests.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.test_suites.is_empty()
    }

    pub fn all_passed(&self) -> bool {
        self.test_suites.values().all(SuiteLedger::all_passed)
    }
}
