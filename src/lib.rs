//! Scenario Report - nested execution reports from test event streams.
//!
//! This crate provides:
//! - A synchronous left-fold turning ordered scenario/step events into
//!   per-scenario report trees
//! - Asynchronous serialization of those trees to the canonical nested
//!   JSON report shape, resolving pending screenshot captures on the way
//! - Stack-trace extraction for errors carried by completion outcomes
//! - A narrow sink trait for handing finished reports to the host
//!
//! # Example
//!
//! ```rust,no_run
//! use scenario_report::{DomainEvent, Outcome, Scenario, Step, TestResult, extract_reports};
//!
//! # async fn demo() -> Result<(), scenario_report::ReportError> {
//! let scenario = Scenario::new("s-1", "logs in", "UserLoginFeature", "features/login.rs");
//! let reports = extract_reports(vec![
//!     DomainEvent::ScenarioStarted { scenario: scenario.clone(), at: 1_000 },
//!     DomainEvent::StepStarted { step: Step::new("opens the page"), at: 1_010 },
//!     DomainEvent::StepCompleted {
//!         outcome: Outcome::new(Step::new("opens the page"), TestResult::Success),
//!         at: 1_200,
//!     },
//!     DomainEvent::ScenarioCompleted {
//!         outcome: Outcome::new(scenario, TestResult::Success),
//!         at: 1_250,
//!     },
//! ])
//! .await?;
//! assert_eq!(reports.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod events;
pub mod model;
pub mod report;
pub mod screenshot;
pub mod sink;
pub mod trace;

// Re-export event and model types
pub use events::DomainEvent;
pub use model::{Outcome, Scenario, Step, TestResult, TimestampMs};

// Re-export the reducer and serializer surface
pub use report::{
    ReportBuilder, ReportError, ReportResult, ScenarioTree, StepTree, UserStory,
    extract_reports, scenario_to_json, slugify,
};

// Re-export screenshot handling
pub use screenshot::{CaptureError, CaptureResult, Screenshot, ScreenshotCapture, capture_at};

// Re-export the sink trait
pub use sink::ReportSink;

// Re-export error rendering
pub use trace::{StackFrame, TestError};
