use results_dashboard::model::record::TestStatus;
use results_dashboard::session::recorder::{MAX_DETAIL_CHARS, SuiteRecorder};
use results_dashboard::store::{PersistMode, ResultsStore, StoreConfig};

use crate::common::utils::results_file;

mod common;

// ============================================================================
// 1. Recording through a session
// ============================================================================

#[test]
fn recorder_registers_suite() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultsStore::open_path(results_file(&dir));
    {
        let rec = SuiteRecorder::new(&mut store, "user_registration");
        assert_eq!(rec.suite(), "user_registration");
    }
    assert!(store.suite("user_registration").is_some());
}

#[test]
fn run_records_pass_and_fail() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultsStore::open_path(results_file(&dir));
    let mut rec = SuiteRecorder::new(&mut store, "login");

    let ok = rec.run("L-001", "Login works", || -> Result<(), String> { Ok(()) });
    let bad = rec.run("L-002", "Login fails", || -> Result<(), String> {
        Err("invalid credentials".to_string())
    });
    assert_eq!(ok, TestStatus::Pass);
    assert_eq!(bad, TestStatus::Fail);

    let summary = rec.finish();
    assert_eq!(summary.suite, "login");
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);

    let suite = store.suite("login").unwrap();
    assert_eq!(suite.tests[0].details, "");
    assert_eq!(suite.tests[1].details, "invalid credentials");
    assert!(suite.tests.iter().all(|t| t.duration >= 0.0));
}

#[test]
fn run_truncates_long_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultsStore::open_path(results_file(&dir));
    let mut rec = SuiteRecorder::new(&mut store, "profile");

    let long = "x".repeat(MAX_DETAIL_CHARS * 3);
    rec.run("P-001", "Edit profile", || Err(long.clone()));
    drop(rec);

    let details = &store.suite("profile").unwrap().tests[0].details;
    assert_eq!(details.chars().count(), MAX_DETAIL_CHARS);
}

#[test]
fn record_passes_through_to_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultsStore::open_path(results_file(&dir));
    let mut rec = SuiteRecorder::new(&mut store, "family");

    let record = rec.record("F-001", "Add member", TestStatus::Pass, 2.5, "");
    assert_eq!(record.suite, "family");
    assert_eq!(record.duration, 2.5);
    drop(rec);

    assert_eq!(store.summary().total_tests, 1);
}

// ============================================================================
// 2. Session scope
// ============================================================================

#[test]
fn summary_covers_only_this_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = results_file(&dir);
    {
        let mut store = ResultsStore::open_path(&path);
        let mut rec = SuiteRecorder::new(&mut store, "nav");
        rec.record("N-001", "Menu", TestStatus::Fail, 0.1, "missing link");
        rec.finish();
    }

    let mut store = ResultsStore::open_path(&path);
    let mut rec = SuiteRecorder::new(&mut store, "nav");
    rec.record("N-001", "Menu", TestStatus::Pass, 0.1, "");
    let summary = rec.finish();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(store.suite("nav").unwrap().metadata.total, 2);
}

#[test]
fn finish_flushes_deferred_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = results_file(&dir);
    let mut store = ResultsStore::open(StoreConfig::at(&path).with_persist(PersistMode::Deferred));

    let mut rec = SuiteRecorder::new(&mut store, "batch");
    rec.record("B-001", "One", TestStatus::Pass, 0.1, "");
    assert!(!path.exists());
    rec.finish();

    assert!(path.exists());
    assert!(!store.is_dirty());
}
