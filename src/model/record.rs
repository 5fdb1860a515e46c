use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ResultsError;

// ============================================================================
// Timestamps
// ============================================================================

/// Local-clock timestamp format used for records and metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time, second precision, no timezone suffix.
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ============================================================================
// TestStatus
// ============================================================================

/// Outcome of a single test. Tests that error out are recorded as `Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestStatus {
    Pass,
    #[default]
    Fail,
}

impl TestStatus {
    pub fn from_passed(passed: bool) -> Self {
        if passed { TestStatus::Pass } else { TestStatus::Fail }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, TestStatus::Pass)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
        }
    }

    /// Lenient mapping for stored data: "pass" in any case is a pass,
    /// everything else counts as a failure.
    fn canonicalize(raw: &str) -> Self {
        Self::from_passed(raw.trim().eq_ignore_ascii_case("pass"))
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("pass") {
            Ok(TestStatus::Pass)
        } else if trimmed.eq_ignore_ascii_case("fail") {
            Ok(TestStatus::Fail)
        } else {
            Err(ResultsError::UnknownStatus(s.to_string()))
        }
    }
}

impl Serialize for TestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older files carry "Pass"/"pass" strings or a bare boolean.
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::String(s) => TestStatus::canonicalize(&s),
            serde_json::Value::Bool(passed) => TestStatus::from_passed(passed),
            _ => TestStatus::Fail,
        })
    }
}

// ============================================================================
// ResultRecord
// ============================================================================

/// One test's outcome. Field names match the persisted JSON schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRecord {
    /// Author-assigned identifier such as "REG-001"
    pub id: String,

    /// Human-readable description
    pub name: String,

    /// Owning suite, denormalized for flattened views
    pub suite: String,

    pub status: TestStatus,

    /// Seconds, never negative
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: f64,

    pub timestamp: String,

    /// Empty on pass, short diagnostic on failure
    pub details: String,
}

impl ResultRecord {
    /// Build a record stamped with the current local time.
    pub fn new(
        suite: &str,
        id: &str,
        name: &str,
        status: TestStatus,
        duration: f64,
        details: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            suite: suite.to_string(),
            status,
            duration: sanitize_duration(duration),
            timestamp: local_timestamp(),
            details: details.to_string(),
        }
    }

    /// Override the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn passed(&self) -> bool {
        self.status.is_pass()
    }
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

// ============================================================================
// Lenient numeric fields
// ============================================================================

/// Decode a float field, reading `null`, strings, and non-finite values as 0.
///
/// serde_json writes non-finite floats as `null`; one such value must not
/// make the whole results file unreadable.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Decode a count field, reading `null`, negatives, and non-integers as 0.
pub(crate) fn lenient_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!("PASS".parse::<TestStatus>().unwrap(), TestStatus::Pass);
        assert_eq!("pass".parse::<TestStatus>().unwrap(), TestStatus::Pass);
        assert_eq!(" Fail ".parse::<TestStatus>().unwrap(), TestStatus::Fail);
        assert!("skipped".parse::<TestStatus>().is_err());
    }

    #[test]
    fn status_deserialize_is_lenient() {
        let parsed: Vec<TestStatus> =
            serde_json::from_str(r#"["Pass", "pass", "FAIL", "error", true, false, 3]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                TestStatus::Pass,
                TestStatus::Pass,
                TestStatus::Fail,
                TestStatus::Fail,
                TestStatus::Pass,
                TestStatus::Fail,
                TestStatus::Fail,
            ]
        );
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TestStatus::Pass).unwrap(), "\"PASS\"");
        assert_eq!(serde_json::to_string(&TestStatus::Fail).unwrap(), "\"FAIL\"");
    }

    #[test]
    fn negative_and_nan_durations_clamp_to_zero() {
        let r = ResultRecord::new("s", "T-1", "t", TestStatus::Pass, -1.0, "");
        assert_eq!(r.duration, 0.0);
        let r = ResultRecord::new("s", "T-1", "t", TestStatus::Pass, f64::NAN, "");
        assert_eq!(r.duration, 0.0);
    }

    #[test]
    fn local_timestamp_has_no_zone_suffix() {
        let ts = local_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
