use std::fmt::Display;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::info;

use crate::model::record::{ResultRecord, TestStatus};
use crate::store::ResultsStore;

/// Longest failure detail kept on a record produced by `SuiteRecorder::run`.
pub const MAX_DETAIL_CHARS: usize = 200;

// ============================================================================
// Session summary
// ============================================================================

/// Counts for the records written during one recorder session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Wall-clock seconds since the recorder was created
    pub duration: f64,
}

// ============================================================================
// SuiteRecorder
// ============================================================================

/// Records the tests of one suite into a shared store.
///
/// ```no_run
/// use results_dashboard::session::recorder::SuiteRecorder;
/// use results_dashboard::store::ResultsStore;
///
/// let mut store = ResultsStore::open_path("results/test_results.json");
/// let mut rec = SuiteRecorder::new(&mut store, "user_registration");
/// rec.run("REG-001", "Register new user", || -> Result<(), String> { Ok(()) });
/// let summary = rec.finish();
/// assert_eq!(summary.total, 1);
/// ```
pub struct SuiteRecorder<'a> {
    store: &'a mut ResultsStore,
    suite: String,
    started: Instant,
    session: Vec<ResultRecord>,
}

impl<'a> SuiteRecorder<'a> {
    pub fn new(store: &'a mut ResultsStore, suite: &str) -> Self {
        store.add_suite(suite, Map::new());
        info!(suite, "suite session started");
        Self {
            store,
            suite: suite.to_string(),
            started: Instant::now(),
            session: Vec::new(),
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Record a finished test.
    pub fn record(
        &mut self,
        test_id: &str,
        test_name: &str,
        status: TestStatus,
        duration: f64,
        details: &str,
    ) -> ResultRecord {
        let record = self
            .store
            .add_test(&self.suite, test_id, test_name, status, duration, details);

        let marker = if record.passed() { "\u{2713}" } else { "\u{2717}" };
        info!(
            "{} {}: {} ({:.2}s) - {}",
            marker, record.id, record.name, record.duration, record.status
        );
        if !record.details.is_empty() {
            info!("    {}", record.details);
        }

        self.session.push(record.clone());
        record
    }

    /// Time `test` and record its outcome. An `Err` becomes a FAIL whose
    /// details hold the error text, truncated to `MAX_DETAIL_CHARS`.
    pub fn run<F, E>(&mut self, test_id: &str, test_name: &str, test: F) -> TestStatus
    where
        F: FnOnce() -> Result<(), E>,
        E: Display,
    {
        let start = Instant::now();
        let outcome = test();
        let elapsed = start.elapsed().as_secs_f64();

        let (status, details) = match outcome {
            Ok(()) => (TestStatus::Pass, String::new()),
            Err(e) => (TestStatus::Fail, truncate_chars(&e.to_string(), MAX_DETAIL_CHARS)),
        };
        self.record(test_id, test_name, status, elapsed, &details);
        status
    }

    /// Counts for this session only, not for earlier runs in the store.
    pub fn summary(&self) -> SessionSummary {
        let total = self.session.len();
        let passed = self.session.iter().filter(|r| r.passed()).count();
        SessionSummary {
            suite: self.suite.clone(),
            total,
            passed,
            failed: total - passed,
            duration: self.started.elapsed().as_secs_f64(),
        }
    }

    /// End the session: flush pending writes and return the summary.
    pub fn finish(mut self) -> SessionSummary {
        let summary = self.summary();
        self.store.flush();
        info!(
            suite = %summary.suite,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "suite session finished"
        );
        summary
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
