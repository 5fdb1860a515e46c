use std::path::PathBuf;

use results_dashboard::model::document::ResultsDocument;
use results_dashboard::model::ledger::DuplicatePolicy;
use results_dashboard::model::record::{ResultRecord, TestStatus};
use tempfile::TempDir;

/// Results file inside a scratch directory, in a not-yet-created subdirectory.
pub fn results_file(dir: &TempDir) -> PathBuf {
    dir.path().join("results").join("test_results.json")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn record_at(suite: &str, id: &str, name: &str, status: TestStatus, timestamp: &str) -> ResultRecord {
    let details = if status.is_pass() { "" } else { "assertion failed" };
    ResultRecord::new(suite, id, name, status, 0.5, details).with_timestamp(timestamp)
}

/// Two suites with fixed timestamps:
/// - login: L-001 PASS (10:00:00), L-002 FAIL (10:00:05)
/// - checkout: C-001 PASS (10:00:02)
pub fn sample_document() -> ResultsDocument {
    let mut doc = ResultsDocument::new();
    let now = "2026-10-17T10:00:10";
    for record in [
        record_at("login", "L-001", "Login works", TestStatus::Pass, "2026-10-17T10:00:00"),
        record_at("login", "L-002", "Login fails wrong pw", TestStatus::Fail, "2026-10-17T10:00:05"),
        record_at("checkout", "C-001", "Cart totals", TestStatus::Pass, "2026-10-17T10:00:02"),
    ] {
        doc.push(record, DuplicatePolicy::KeepHistory, now);
    }
    doc.recompute_summary(now);
    doc
}
