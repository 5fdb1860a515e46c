use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::model::document::ResultsDocument;
use crate::model::record::{ResultRecord, TestStatus};
use crate::report::console::format_console_summary;
use crate::report::dashboard::{dashboard_path_for, write_dashboard};
use crate::report::junit::generate_junit_xml;
use crate::store::ResultsStore;
use crate::store::config::StoreConfig;
use crate::store::results_store::load_document;

/// File name of the JUnit export written next to the results JSON.
pub const JUNIT_FILE: &str = "test_results.xml";

// ============================================================================
// report subcommand
// ============================================================================

/// Output of the `report` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Console,
    Junit,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "console" => Ok(Self::Console),
            "junit" => Ok(Self::Junit),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

impl ReportFormat {
    /// Parse `name`, falling back to HTML with a warning.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "expected html, console or junit; rendering html");
            Self::Html
        })
    }
}

/// Render the results file and return whether every recorded test passed.
///
/// A missing or unreadable results file renders as an empty document.
pub fn cmd_report(
    store_config: &StoreConfig,
    format: &str,
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let results_file = &store_config.results_file;
    let doc = read_results(results_file);
    let all_passed = doc.all_passed();

    match ReportFormat::from_name(format) {
        ReportFormat::Console => {
            let content = format_console_summary(&doc);
            match output {
                Some(path) => std::fs::write(path, &content)?,
                None => print!("{}", content),
            }
        }
        ReportFormat::Junit => {
            let path = resolve_output(output, || results_file.with_file_name(JUNIT_FILE));
            write_report(&path, &generate_junit_xml(&doc))?;
            println!("JUnit report written: {}", path.display());
        }
        ReportFormat::Html => {
            let path = resolve_output(output, || dashboard_path_for(results_file));
            let path = write_dashboard(&doc, &path)?;
            let shown = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            println!("Dashboard generated: file://{}", shown.display());
        }
    }

    Ok(all_passed)
}

// ============================================================================
// record subcommand
// ============================================================================

/// Append one result to the results file.
pub fn cmd_record(
    store_config: &StoreConfig,
    suite: &str,
    id: &str,
    name: &str,
    status: &str,
    duration: f64,
    details: &str,
) -> Result<ResultRecord, Box<dyn std::error::Error>> {
    let status: TestStatus = status.parse()?;
    let mut store = ResultsStore::open(store_config.clone());
    let record = store.add_test(suite, id, name, status, duration, details);
    store.flush();

    println!(
        "{} {}: {} ({:.2}s) - {}",
        if record.passed() { "\u{2713}" } else { "\u{2717}" },
        record.id,
        record.name,
        record.duration,
        record.status
    );
    Ok(record)
}

// ============================================================================
// clear subcommand
// ============================================================================

pub fn cmd_clear(store_config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ResultsStore::open(store_config.clone());
    store.clear();
    store.try_save()?;
    println!("Cleared {}", store.path().display());
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Read a results file without going through a store, so reporting never
/// rewrites it.
pub fn read_results(path: &Path) -> ResultsDocument {
    match load_document(path) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            warn!(path = %path.display(), "results file not found, rendering empty report");
            ResultsDocument::new()
        }
        Err(e) => {
            warn!(error = %e, "results file unreadable, rendering empty report");
            ResultsDocument::new()
        }
    }
}

fn resolve_output(output: Option<&str>, default: impl FnOnce() -> PathBuf) -> PathBuf {
    output.map(PathBuf::from).unwrap_or_else(default)
}

fn write_report(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
