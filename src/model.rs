//! Core domain types shared by the event stream and the report tree.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::screenshot::ScreenshotCapture;
use crate::trace::TestError;

/// Event timestamps are monotonic milliseconds since the Unix epoch.
pub type TimestampMs = i64;

/// One executable test case as announced by the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario id
    pub id: String,

    /// Display name
    pub name: String,

    /// Grouping/feature name this scenario belongs to
    pub category: String,

    /// Source file the scenario was loaded from
    pub path: PathBuf,
}

impl Scenario {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            path: path.into(),
        }
    }
}

/// One action or assertion within a scenario.
///
/// A step accumulates screenshot captures while it runs. Captures are
/// single-consumer futures, so the step carried by a completion outcome
/// holds only the captures produced after the step started.
#[derive(Debug)]
pub struct Step {
    /// Display name
    pub name: String,

    /// Pending screenshot captures attached so far
    pub screenshots: Vec<ScreenshotCapture>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            screenshots: Vec::new(),
        }
    }

    /// Attach a pending screenshot capture to this step
    pub fn with_screenshot(mut self, capture: ScreenshotCapture) -> Self {
        self.screenshots.push(capture);
        self
    }
}

/// Terminal result of a scenario or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestResult {
    Success,
    Failure,
    Error,
    Pending,
    Skipped,
    Compromised,
}

impl TestResult {
    /// The string form used in emitted reports
    pub const fn as_str(self) -> &'static str {
        match self {
            TestResult::Success => "SUCCESS",
            TestResult::Failure => "FAILURE",
            TestResult::Error => "ERROR",
            TestResult::Pending => "PENDING",
            TestResult::Skipped => "SKIPPED",
            TestResult::Compromised => "COMPROMISED",
        }
    }
}

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion record attached to a subject when it finishes.
#[derive(Debug)]
pub struct Outcome<T> {
    /// The scenario or step that completed
    pub subject: T,

    /// Terminal result
    pub result: TestResult,

    /// Error raised during execution, if any
    pub error: Option<TestError>,
}

impl<T> Outcome<T> {
    pub fn new(subject: T, result: TestResult) -> Self {
        Self {
            subject,
            result,
            error: None,
        }
    }

    pub fn with_error(subject: T, result: TestResult, error: TestError) -> Self {
        Self {
            subject,
            result,
            error: Some(error),
        }
    }
}
