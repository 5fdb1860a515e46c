use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ResultsError};
use crate::store::config::{DEFAULT_RESULTS_FILE, DuplicatePolicy, PersistMode, StoreConfig};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "results-dashboard.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "results-dashboard",
    version,
    about = "Aggregate UI test results and render a static HTML dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to config file (default: results-dashboard.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the results file as a dashboard, console summary, or JUnit XML
    Report {
        /// Results JSON file (default: results/test_results.json)
        #[arg(long)]
        results: Option<String>,

        /// Output format: html, console, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: next to the results file; stdout for console)
        #[arg(short, long)]
        output: Option<String>,

        /// Exit non-zero when any recorded test failed
        #[arg(long)]
        fail_on_failure: bool,
    },

    /// Append one test result to the results file
    Record {
        /// Results JSON file (default: results/test_results.json)
        #[arg(long)]
        results: Option<String>,

        /// Suite the test belongs to
        #[arg(long)]
        suite: String,

        /// Test identifier, e.g. REG-001
        #[arg(long)]
        id: String,

        /// Human-readable test name
        #[arg(long)]
        name: String,

        /// PASS or FAIL (any case)
        #[arg(long)]
        status: String,

        /// Duration in seconds
        #[arg(long, default_value_t = 0.0)]
        duration: f64,

        /// Failure details
        #[arg(long, default_value = "")]
        details: String,
    },

    /// Remove every suite from the results file
    Clear {
        /// Results JSON file (default: results/test_results.json)
        #[arg(long)]
        results: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `results-dashboard.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub results_file: Option<String>,

    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    #[serde(default)]
    pub persist: PersistMode,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_html")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "html".to_string(),
            output: None,
        }
    }
}

// Serde default helpers
fn default_html() -> String { "html".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match try_load_config(config_path) {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            warn!(error = %e, "ignoring config file");
            AppConfig::default()
        }
    }
}

/// Parse a YAML config file. `Ok(None)` when the file does not exist.
pub fn try_load_config(path: &str) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ResultsError::io(path, e)),
    };
    Ok(Some(serde_yaml::from_str(&content)?))
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build a StoreConfig: CLI flag > config file > default path.
pub fn build_store_config(results: Option<&str>, config: &AppConfig) -> StoreConfig {
    let results_file = results
        .or(config.results_file.as_deref())
        .unwrap_or(DEFAULT_RESULTS_FILE);

    StoreConfig {
        results_file: PathBuf::from(results_file),
        persist: config.persist,
        duplicates: config.duplicates,
    }
}
