//! Scenario harness: one browser session per scenario.
//!
//! [`Harness::run`] acquires a session from a [`SessionProvider`], hands the
//! scenario body a [`PageContext`], and on every exit path (success, error or
//! panic) captures a screenshot if the body failed and then closes the
//! session. A panicking body is resumed after teardown so the calling test
//! still fails with its own assertion message.

use crate::config::SuiteConfig;
use crate::driver::SharedDriver;
use crate::pages::PageContext;
use crate::reporter::{FailureReporter, SuiteReport, TestResultEntry, TestStatus};
use crate::result::{StorefrontError, StorefrontResult};
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, warn, Instrument};

/// Scenario category used for selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Happy-path flows
    Positive,
    /// Rejected input
    Negative,
    /// Form validation
    Validation,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Validation => "validation",
        })
    }
}

impl FromStr for Marker {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "validation" => Ok(Self::Validation),
            other => Err(StorefrontError::Config {
                message: format!("unknown marker {other:?}"),
            }),
        }
    }
}

/// Source of ready-to-use browser sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a fresh, isolated session
    async fn open(&self) -> StorefrontResult<SharedDriver>;
}

/// What happened to one scenario
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Marker it was tagged with
    pub marker: Marker,
    /// Outcome
    pub status: TestStatus,
    /// Wall time including setup and teardown
    pub duration: Duration,
    /// Failure message
    pub error: Option<String>,
    /// Failure screenshot
    pub attachment: Option<PathBuf>,
}

impl ScenarioOutcome {
    fn from_entry(entry: &TestResultEntry) -> Self {
        Self {
            name: entry.name.clone(),
            marker: entry.marker,
            status: entry.status,
            duration: entry.duration,
            error: entry.error.clone(),
            attachment: entry.attachment.clone(),
        }
    }

    /// Whether the scenario ran and passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.status.is_passed()
    }

    /// Whether the scenario was skipped by marker selection
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.status == TestStatus::Skipped
    }

    /// Fail the calling test unless the scenario passed or was skipped.
    ///
    /// # Panics
    ///
    /// Panics with the scenario's error when it failed.
    pub fn assert_passed(&self) {
        if self.status.is_failed() {
            panic!(
                "scenario {} failed: {}",
                self.name,
                self.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Report files produced by [`Harness::write_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    /// Pretty JSON summary
    pub json: PathBuf,
    /// JUnit XML for CI
    pub junit: PathBuf,
}

/// Runs scenarios against sessions from a provider
pub struct Harness {
    provider: Arc<dyn SessionProvider>,
    config: SuiteConfig,
    reporter: FailureReporter,
    report: Mutex<SuiteReport>,
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

impl Harness {
    /// Harness drawing sessions from `provider`
    #[must_use]
    pub fn new(provider: Arc<dyn SessionProvider>, config: SuiteConfig) -> Self {
        let reporter = FailureReporter::new(config.artifacts_dir.clone());
        Self {
            provider,
            config,
            reporter,
            report: Mutex::new(SuiteReport::new("storefront")),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Snapshot of the results recorded so far
    #[must_use]
    pub fn report(&self) -> SuiteReport {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write the results recorded so far to the artifacts directory:
    /// `storefront-report.json` and `storefront-junit.xml`.
    pub fn write_report(&self) -> StorefrontResult<ReportFiles> {
        let dir = &self.config.artifacts_dir;
        std::fs::create_dir_all(dir)?;
        let files = ReportFiles {
            json: dir.join("storefront-report.json"),
            junit: dir.join("storefront-junit.xml"),
        };
        let report = self.report();
        report.write_json(&files.json)?;
        report.write_junit(&files.junit)?;
        info!(summary = %report.summary(), "suite report written");
        Ok(files)
    }

    fn record(&self, entry: TestResultEntry) -> ScenarioOutcome {
        let outcome = ScenarioOutcome::from_entry(&entry);
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(entry);
        outcome
    }

    /// Run one scenario in its own session.
    ///
    /// Skipped without opening a session when `marker` is not selected.
    pub async fn run<F, Fut>(&self, name: &str, marker: Marker, body: F) -> ScenarioOutcome
    where
        F: FnOnce(PageContext) -> Fut,
        Fut: Future<Output = StorefrontResult<()>>,
    {
        if !self.config.is_selected(marker) {
            info!(scenario = name, %marker, "scenario skipped");
            return self.record(TestResultEntry::skipped(name, marker));
        }

        let span = info_span!("scenario", name, %marker);
        self.run_selected(name, marker, body).instrument(span).await
    }

    async fn run_selected<F, Fut>(&self, name: &str, marker: Marker, body: F) -> ScenarioOutcome
    where
        F: FnOnce(PageContext) -> Fut,
        Fut: Future<Output = StorefrontResult<()>>,
    {
        let started = Instant::now();
        info!("scenario started");

        let driver = match self.provider.open().await {
            Ok(driver) => driver,
            Err(e) => {
                error!(error = %e, "session not opened");
                return self.record(TestResultEntry::failed(
                    name,
                    marker,
                    started.elapsed(),
                    e.to_string(),
                ));
            }
        };

        let ctx = PageContext::new(Arc::clone(&driver), &self.config);
        let outcome = AssertUnwindSafe(async move { body(ctx).await })
            .catch_unwind()
            .await;

        let (failure, panic) = match outcome {
            Ok(Ok(())) => (None, None),
            Ok(Err(e)) => (Some(e.to_string()), None),
            Err(payload) => (Some(panic_message(payload.as_ref())), Some(payload)),
        };

        let attachment = match &failure {
            Some(message) => {
                error!(error = %message, "scenario failed");
                self.reporter.capture(driver.as_ref(), name).await
            }
            None => None,
        };

        if let Err(e) = driver.close().await {
            warn!(error = %e, "session teardown failed");
        }

        let duration = started.elapsed();
        let entry = match failure {
            Some(message) => {
                TestResultEntry::failed(name, marker, duration, message).with_attachment(attachment)
            }
            None => {
                info!(duration_ms = duration.as_millis() as u64, "scenario passed");
                TestResultEntry::passed(name, marker, duration)
            }
        };
        let outcome = self.record(entry);

        if let Some(payload) = panic {
            std::panic::resume_unwind(payload);
        }
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "scenario panicked".to_string())
}
