use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::record::{ResultRecord, lenient_f64, lenient_usize};

// ============================================================================
// Suite ledger — per-suite records plus rolling statistics
// ============================================================================

/// Keys owned by the statistics recomputation; caller metadata may not set them.
const RESERVED_KEYS: &[&str] = &["total", "passed", "failed", "pass_rate", "duration", "updated"];

/// What happens when a suite receives a record whose id it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Append; earlier runs stay in the ledger as history
    #[default]
    KeepHistory,
    /// Drop earlier records with the same id before appending
    LatestWins,
}

/// Derived statistics of a suite, plus any caller-supplied keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteMetadata {
    #[serde(deserialize_with = "lenient_usize")]
    pub total: usize,
    #[serde(deserialize_with = "lenient_usize")]
    pub passed: usize,
    #[serde(deserialize_with = "lenient_usize")]
    pub failed: usize,
    #[serde(deserialize_with = "lenient_f64")]
    pub pass_rate: f64,
    /// Saturates at `f64::MAX` so the sum always serializes as a number
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: f64,
    pub updated: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SuiteMetadata {
    pub fn with_extra(mut extra: Map<String, Value>) -> Self {
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        Self {
            extra,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteLedger {
    pub metadata: SuiteMetadata,

    /// Append-only, in recording order
    pub tests: Vec<ResultRecord>,
}

impl SuiteLedger {
    pub fn new(extra: Map<String, Value>) -> Self {
        Self {
            metadata: SuiteMetadata::with_extra(extra),
            tests: Vec::new(),
        }
    }

    /// Append a record under `policy` and recompute statistics.
    ///
    /// Returns the number of earlier records the append displaced
    /// (always 0 under `KeepHistory`).
    pub fn push(&mut self, record: ResultRecord, policy: DuplicatePolicy, now: &str) -> usize {
        let before = self.tests.len();
        if policy == DuplicatePolicy::LatestWins {
            self.tests.retain(|t| t.id != record.id);
        }
        let displaced = before - self.tests.len();
        self.tests.push(record);
        self.recompute(now);
        displaced
    }

    /// Recompute every derived statistic from `tests`.
    pub fn recompute(&mut self, now: &str) {
        let total = self.tests.len();
        let passed = self.tests.iter().filter(|t| t.passed()).count();
        let meta = &mut self.metadata;
        meta.total = total;
        meta.passed = passed;
        meta.failed = total - passed;
        meta.pass_rate = pass_rate(passed, total);
        meta.duration = self
            .tests
            .iter()
            .fold(0.0, |acc: f64, t| (acc + t.duration).min(f64::MAX));
        meta.updated = now.to_string();
    }

    pub fn all_passed(&self) -> bool {
        self.metadata.failed == 0
    }

    /// Whether the stored metadata agrees with the stored tests.
    pub fn is_consistent(&self) -> bool {
        let meta = &self.metadata;
        meta.total == self.tests.len() && meta.passed.checked_add(meta.failed) == Some(meta.total)
    }
}

/// Percentage of passing tests, 0 for an empty set.
pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}
