//! Reporter - scenario results and failure attachments.
//!
//! [`FailureReporter`] captures a viewport screenshot when a scenario fails
//! and stores it as `failed_test_<name>_<YYYY-mm-dd_HH-MM-SS>.png`. Capture
//! problems are logged and swallowed so they never mask the scenario's own
//! failure. [`SuiteReport`] collects one [`TestResultEntry`] per scenario and
//! renders JSON and JUnit summaries for CI.

use crate::driver::Driver;
use crate::harness::Marker;
use crate::result::StorefrontResult;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Timestamp layout used in attachment names
const ATTACHMENT_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// Scenario status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
    /// Scenario was not selected
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Scenario name
    pub name: String,
    /// Marker the scenario is tagged with
    pub marker: Marker,
    /// Outcome
    pub status: TestStatus,
    /// Wall time including session setup and teardown
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Failure screenshot, when one was captured
    pub attachment: Option<PathBuf>,
}

impl TestResultEntry {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, marker: Marker, duration: Duration) -> Self {
        Self {
            name: name.into(),
            marker,
            status: TestStatus::Passed,
            duration,
            error: None,
            attachment: None,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        marker: Marker,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            marker,
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            attachment: None,
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>, marker: Marker) -> Self {
        Self {
            name: name.into(),
            marker,
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            attachment: None,
        }
    }

    /// Attach a failure screenshot
    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<PathBuf>) -> Self {
        self.attachment = attachment;
        self
    }
}

/// Writes failure screenshots under the artifacts directory
#[derive(Debug, Clone)]
pub struct FailureReporter {
    artifacts_dir: PathBuf,
}

impl FailureReporter {
    /// Reporter writing into `artifacts_dir` (created on first capture)
    #[must_use]
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
        }
    }

    /// Directory attachments are written to
    #[must_use]
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// `failed_test_<name>_<YYYY-mm-dd_HH-MM-SS>.png`
    ///
    /// Characters outside `[A-Za-z0-9_-]` in the test name become `_`.
    #[must_use]
    pub fn attachment_name(test_name: &str, at: NaiveDateTime) -> String {
        let name: String = test_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("failed_test_{name}_{}.png", at.format(ATTACHMENT_TIMESTAMP))
    }

    /// Capture the viewport for a failed scenario.
    ///
    /// Returns the attachment path, or `None` when the capture or the write
    /// failed (logged at warn).
    pub async fn capture(&self, driver: &dyn Driver, test_name: &str) -> Option<PathBuf> {
        let screenshot = match driver.screenshot().await {
            Ok(screenshot) => screenshot,
            Err(e) => {
                warn!(test = test_name, error = %e, "failure screenshot not captured");
                return None;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.artifacts_dir).await {
            warn!(dir = %self.artifacts_dir.display(), error = %e, "artifacts dir not created");
            return None;
        }

        let path = self
            .artifacts_dir
            .join(Self::attachment_name(test_name, Local::now().naive_local()));
        match tokio::fs::write(&path, &screenshot.data).await {
            Ok(()) => {
                info!(
                    test = test_name,
                    path = %path.display(),
                    bytes = screenshot.size_bytes(),
                    "failure screenshot attached"
                );
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failure screenshot not written");
                None
            }
        }
    }
}

/// Results of every scenario run through a harness
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite_name: String,
    /// One entry per scenario, in completion order
    pub results: Vec<TestResultEntry>,
}

impl SuiteReport {
    /// Empty report
    #[must_use]
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            results: Vec::new(),
        }
    }

    /// Record a scenario result
    pub fn record(&mut self, result: TestResultEntry) {
        self.results.push(result);
    }

    /// Get number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Get number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Check if every executed scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Failing scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped",
            self.suite_name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count()
        )
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, output_path: &Path) -> StorefrontResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// Write JUnit XML for CI integration
    pub fn write_junit(&self, output_path: &Path) -> StorefrontResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let total: Duration = self.results.iter().map(|r| r.duration).sum();
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\">\n",
            escape_xml(&self.suite_name),
            self.results.len(),
            self.failed_count(),
            self.skipped_count(),
            total.as_secs_f64()
        ));

        for result in &self.results {
            xml.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\">\n",
                escape_xml(&result.name),
                result.marker,
                result.duration.as_secs_f64()
            ));
            match result.status {
                TestStatus::Failed => {
                    let error = result.error.as_deref().unwrap_or_default();
                    xml.push_str(&format!(
                        "    <failure message=\"{}\"/>\n",
                        escape_xml(error)
                    ));
                }
                TestStatus::Skipped => xml.push_str("    <skipped/>\n"),
                TestStatus::Passed => {}
            }
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
