use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultsError {
    /// Reading or writing a results, config, or report file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Results document could not be parsed or serialized
    #[error("JSON error on {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config file could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Status string is neither PASS nor FAIL
    #[error("unknown test status '{0}' (expected PASS or FAIL)")]
    UnknownStatus(String),
}

impl ResultsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResultsError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ResultsError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResultsError>;
