use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, ResultsError};
use crate::model::document::ResultsDocument;
use crate::model::record::{ResultRecord, TIMESTAMP_FORMAT};

// ============================================================================
// HTML dashboard — self-contained report of a results document
// ============================================================================

/// File name of the dashboard written next to the results JSON.
pub const DASHBOARD_FILE: &str = "test_results.html";

const PASS_COLOR: &str = "#28a745";
const FAIL_COLOR: &str = "#dc3545";

/// Render the dashboard for `doc`.
///
/// Pure: no clock reads and no I/O, so the same document always renders
/// to the same bytes. Layout:
/// - four stat cards (total, passed, failed, pass rate with progress bar)
/// - one summary row per suite, in suite-name order
/// - every record, newest first, filterable by status from inline JS
///
/// CSS and JS are inlined so the file works from `file://` with no
/// network access.
pub fn generate_dashboard(doc: &ResultsDocument) -> String {
    let summary = &doc.summary;
    let bar_width = summary.pass_rate.clamp(0.0, 100.0);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Test Results Dashboard</title>
<style>
{css}
</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>Test Results Dashboard</h1>
<p>Comprehensive Test Suite Execution Report</p>
</div>
<div class="stats">
<div class="stat-card"><h3>{total}</h3><p>Total Tests</p></div>
<div class="stat-card passed"><h3>{passed}</h3><p>Tests Passed</p></div>
<div class="stat-card failed"><h3>{failed}</h3><p>Tests Failed</p></div>
<div class="stat-card"><h3>{rate:.1}%</h3><p>Pass Rate</p>
<div class="progress-bar"><div class="progress-fill" style="width: {bar:.1}%">{rate:.1}%</div></div>
</div>
</div>
<div class="content">
<div class="section">
<h2 class="section-title">Test Suites Summary</h2>
<table>
<thead>
<tr><th>Suite Name</th><th class="text-center">Total</th><th class="text-center">Passed</th><th class="text-center">Failed</th><th class="text-center">Pass Rate</th><th class="text-center">Status</th></tr>
</thead>
<tbody>
{suite_rows}</tbody>
</table>
</div>
<div class="section">
<h2 class="section-title">Detailed Test Results</h2>
<div class="filters">
<button class="filter-btn active" onclick="filterTests('all', this)">All Tests</button>
<button class="filter-btn" onclick="filterTests('pass', this)">Passed</button>
<button class="filter-btn" onclick="filterTests('fail', this)">Failed</button>
</div>
<table id="test-table">
<thead>
<tr><th>Test ID</th><th>Test Name</th><th>Suite</th><th>Status</th><th>Duration</th><th>Timestamp</th><th>Details</th></tr>
</thead>
<tbody id="test-body">
{test_rows}</tbody>
</table>
</div>
</div>
<div class="footer">
<p><strong>Last Updated:</strong> {updated}</p>
</div>
</div>
<script>
{script}
</script>
</body>
</html>
"##,
        css = DASHBOARD_CSS,
        total = summary.total_tests,
        passed = summary.total_passed,
        failed = summary.total_failed,
        rate = summary.pass_rate,
        bar = bar_width,
        suite_rows = suite_rows(doc),
        test_rows = test_rows(doc),
        updated = escape_html(&format_updated(&doc.metadata.updated)),
        script = FILTER_SCRIPT,
    )
}

/// Render `doc` and write it to `path`, creating the parent directory.
pub fn write_dashboard(doc: &ResultsDocument, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ResultsError::io(parent, e))?;
    }
    fs::write(path, generate_dashboard(doc)).map_err(|e| ResultsError::io(path, e))?;

    let shown = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    info!(url = %format!("file://{}", shown.display()), "dashboard generated");
    Ok(path.to_path_buf())
}

/// Dashboard location for a results file: `test_results.html` beside it.
pub fn dashboard_path_for(results_file: &Path) -> PathBuf {
    results_file.with_file_name(DASHBOARD_FILE)
}

// ============================================================================
// Table rows
// ============================================================================

fn suite_rows(doc: &ResultsDocument) -> String {
    let mut rows = String::new();
    // BTreeMap iteration is already name-ascending
    for (name, suite) in &doc.test_suites {
        let meta = &suite.metadata;
        let ok = meta.failed == 0;
        rows.push_str(&format!(
            "<tr><td class=\"suite-name\">{name}</td><td class=\"text-center\">{total}</td><td class=\"text-center passed\">{passed}</td><td class=\"text-center failed\">{failed}</td><td class=\"text-center\"><span class=\"badge\" style=\"background-color: {color}\">{rate:.1}%</span></td><td class=\"text-center\">{status}</td></tr>\n",
            name = escape_html(name),
            total = meta.total,
            passed = meta.passed,
            failed = meta.failed,
            color = if ok { PASS_COLOR } else { FAIL_COLOR },
            rate = meta.pass_rate,
            status = if ok { "PASS" } else { "FAIL" },
        ));
    }
    rows
}

fn test_rows(doc: &ResultsDocument) -> String {
    let mut rows = String::new();
    for record in records_newest_first(doc) {
        let ok = record.passed();
        rows.push_str(&format!(
            "<tr class=\"{class}\"><td class=\"test-id\">{id}</td><td>{name}</td><td class=\"suite-name\">{suite}</td><td><span class=\"badge\" style=\"background-color: {color}\">{status}</span></td><td class=\"duration\">{duration:.2}s</td><td>{timestamp}</td><td>{details}</td></tr>\n",
            class = if ok { "pass-row" } else { "fail-row" },
            id = escape_html(&record.id),
            name = escape_html(&record.name),
            suite = escape_html(&record.suite),
            color = if ok { PASS_COLOR } else { FAIL_COLOR },
            status = record.status,
            duration = record.duration,
            timestamp = escape_html(&format_timestamp(&record.timestamp)),
            details = escape_html(&record.details),
        ));
    }
    rows
}

/// All records sorted by timestamp, newest first. The sort is stable, so
/// equal timestamps keep suite-name then recording order.
pub fn records_newest_first(doc: &ResultsDocument) -> Vec<&ResultRecord> {
    let mut records = doc.all_tests_flat();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

fn format_updated(updated: &str) -> String {
    if updated.is_empty() {
        return "never".to_string();
    }
    match parse_timestamp(updated) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => updated.to_string(),
    }
}

/// Record timestamp at second precision; unparseable values pass through.
fn format_timestamp(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

/// Accepts local ISO timestamps with optional fractional seconds, and
/// RFC 3339 timestamps carrying an offset (shown in their own offset).
fn parse_timestamp(value: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Inline assets
// ============================================================================

const DASHBOARD_CSS: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; padding: 20px; }
.container { max-width: 1400px; margin: 0 auto; background: white; border-radius: 8px; box-shadow: 0 10px 40px rgba(0,0,0,0.2); overflow: hidden; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px; text-align: center; }
.header h1 { font-size: 2.5em; margin-bottom: 10px; }
.header p { font-size: 1.1em; opacity: 0.9; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; padding: 30px; background: #f8f9fa; border-bottom: 2px solid #e9ecef; }
.stat-card { background: white; padding: 20px; border-radius: 6px; text-align: center; box-shadow: 0 2px 10px rgba(0,0,0,0.05); }
.stat-card h3 { color: #667eea; font-size: 2em; margin-bottom: 5px; }
.stat-card p { color: #666; font-size: 0.9em; }
.stat-card.passed h3 { color: #28a745; }
.stat-card.failed h3 { color: #dc3545; }
.content { padding: 30px; }
.section { margin-bottom: 40px; }
.section-title { font-size: 1.5em; color: #333; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 3px solid #667eea; }
table { width: 100%; border-collapse: collapse; background: white; }
thead { background: #f8f9fa; }
th { padding: 15px; text-align: left; font-weight: 600; color: #333; border-bottom: 2px solid #dee2e6; }
td { padding: 12px 15px; border-bottom: 1px solid #dee2e6; }
tr:hover { background: #f8f9fa; }
.pass-row { border-left: 4px solid #28a745; }
.fail-row { border-left: 4px solid #dc3545; background: #fff5f5; }
.badge { display: inline-block; padding: 5px 12px; border-radius: 20px; color: white; font-size: 0.85em; font-weight: 600; }
.suite-name { font-weight: 600; color: #667eea; }
.test-id { font-weight: 600; color: #555; font-family: monospace; }
.text-center { text-align: center; }
.passed { color: #28a745; font-weight: 600; }
.failed { color: #dc3545; font-weight: 600; }
.filters { display: flex; gap: 15px; margin-bottom: 20px; flex-wrap: wrap; }
.filter-btn { padding: 8px 16px; border: 2px solid #dee2e6; background: white; border-radius: 4px; cursor: pointer; font-size: 0.95em; }
.filter-btn.active { background: #667eea; color: white; border-color: #667eea; }
.filter-btn:hover { border-color: #667eea; }
.footer { background: #f8f9fa; padding: 20px; text-align: center; color: #666; border-top: 1px solid #dee2e6; }
.progress-bar { width: 100%; height: 30px; background: #e9ecef; border-radius: 15px; overflow: hidden; margin-top: 10px; }
.progress-fill { height: 100%; background: linear-gradient(90deg, #28a745 0%, #20c997 100%); display: flex; align-items: center; justify-content: center; color: white; font-weight: 600; font-size: 0.9em; }
.duration { font-family: monospace; color: #666; }"#;

const FILTER_SCRIPT: &str = r#"function filterTests(filter, button) {
  document.querySelectorAll('.filter-btn').forEach(function (btn) { btn.classList.remove('active'); });
  button.classList.add('active');
  document.querySelectorAll('#test-body tr').forEach(function (row) {
    if (filter === 'all') {
      row.style.display = '';
    } else if (filter === 'pass') {
      row.style.display = row.classList.contains('pass-row') ? '' : 'none';
    } else {
      row.style.display = row.classList.contains('fail-row') ? '' : 'none';
    }
  });
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_is_reformatted_when_parseable() {
        assert_eq!(format_updated("2026-10-17T09:05:01"), "2026-10-17 09:05:01");
        assert_eq!(format_updated("yesterday"), "yesterday");
        assert_eq!(format_updated(""), "never");
    }

    #[test]
    fn record_timestamps_drop_fractional_seconds() {
        assert_eq!(format_timestamp("2026-10-17T09:05:01.123456"), "2026-10-17T09:05:01");
        assert_eq!(format_timestamp("2026-10-17T09:05:01"), "2026-10-17T09:05:01");
        assert_eq!(format_timestamp("2026-10-17T09:05:01.5+02:00"), "2026-10-17T09:05:01");
        assert_eq!(format_timestamp("not a time"), "not a time");
    }

    #[test]
    fn escape_html_covers_markup() {
        assert_eq!(
            escape_html(r#"<b class="x">Tom & 'Jerry'</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
