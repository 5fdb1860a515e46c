use crate::model::document::ResultsDocument;

// ============================================================================
// JUnit XML reporter — standard CI integration format
// ============================================================================

/// Generate JUnit XML for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// One `<testsuite>` per suite, in suite-name order:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuites tests="2" failures="1">
///   <testsuite name="login" tests="2" failures="1" time="1.730">
///     <testcase name="L-001: Login works" classname="login" time="1.230" />
///     <testcase name="L-002: Login fails wrong pw" classname="login" time="0.500">
///       <failure message="test failed" type="TestFailure">invalid credentials</failure>
///     </testcase>
///   </testsuite>
/// </testsuites>
/// ```
pub fn generate_junit_xml(doc: &ResultsDocument) -> String {
    let mut suites = String::new();

    for (name, suite) in &doc.test_suites {
        let meta = &suite.metadata;
        suites.push_str(&format!(
            "  <testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" time=\"{time:.3}\">\n",
            name = escape_xml(name),
            tests = meta.total,
            failures = meta.failed,
            time = meta.duration,
        ));

        for record in &suite.tests {
            let case_name = escape_xml(&format!("{}: {}", record.id, record.name));
            if record.passed() {
                suites.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\" />\n",
                    case_name,
                    escape_xml(name),
                    record.duration
                ));
            } else {
                let message = if record.details.is_empty() {
                    "test failed"
                } else {
                    record.details.as_str()
                };
                suites.push_str(&format!(
                    "    <testcase name=\"{case}\" classname=\"{class}\" time=\"{time:.3}\">\n      <failure message=\"{message}\" type=\"TestFailure\">{body}</failure>\n    </testcase>\n",
                    case = case_name,
                    class = escape_xml(name),
                    time = record.duration,
                    message = escape_xml(first_line(message)),
                    body = escape_xml(&record.details),
                ));
            }
        }

        suites.push_str("  </testsuite>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites tests=\"{tests}\" failures=\"{failures}\">\n{suites}</testsuites>\n",
        tests = doc.summary.total_tests,
        failures = doc.summary.total_failed,
        suites = suites,
    )
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
