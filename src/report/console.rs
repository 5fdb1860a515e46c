use crate::model::document::ResultsDocument;
use crate::session::recorder::SessionSummary;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

const RULE_WIDTH: usize = 80;

/// Format a whole results document for terminal output.
///
/// Produces output like:
/// ```text
/// === Suite: login (1 passed, 1 failed) ===
/// ✓ PASS  L-001 Login works (1.23s)
/// ✗ FAIL  L-002 Login fails wrong pw (0.50s)
///     invalid credentials
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_summary(doc: &ResultsDocument) -> String {
    let mut out = String::new();

    for (name, suite) in &doc.test_suites {
        out.push_str(&format!(
            "=== Suite: {} ({} passed, {} failed) ===\n",
            name, suite.metadata.passed, suite.metadata.failed
        ));

        for record in &suite.tests {
            let marker = if record.passed() {
                "\u{2713} PASS"
            } else {
                "\u{2717} FAIL"
            };
            out.push_str(&format!(
                "{}  {} {} ({:.2}s)\n",
                marker, record.id, record.name, record.duration
            ));
            if !record.passed() && !record.details.is_empty() {
                out.push_str(&format!("    {}\n", record.details));
            }
        }
        out.push('\n');
    }

    let summary = &doc.summary;
    out.push_str(&format!(
        "=== Results: {} passed, {} failed ({} total, {:.1}%) ===\n",
        summary.total_passed, summary.total_failed, summary.total_tests, summary.pass_rate
    ));

    out
}

/// Banner printed when a suite session ends.
pub fn format_session_summary(summary: &SessionSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\nTEST SESSION SUMMARY - {suite}\n{rule}\nTotal Tests: {total}\nPassed: {passed}/{total}\nFailed: {failed}/{total}\nDuration: {duration:.2}s\n{rule}\n",
        rule = rule,
        suite = summary.suite,
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        duration = summary.duration,
    )
}
