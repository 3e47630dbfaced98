//! Domain events consumed by the report builder.

use crate::model::{Outcome, Scenario, Step, TimestampMs};

/// A test-execution notification.
///
/// The stream is totally ordered and finite; the reducer folds it left to
/// right and never looks ahead. Completion events carry the subject's
/// outcome rather than the bare subject.
#[derive(Debug)]
pub enum DomainEvent {
    /// A scenario began executing
    ScenarioStarted { scenario: Scenario, at: TimestampMs },

    /// A step began executing inside the currently open node
    StepStarted { step: Step, at: TimestampMs },

    /// The currently open step finished
    StepCompleted {
        outcome: Outcome<Step>,
        at: TimestampMs,
    },

    /// A previously started scenario finished
    ScenarioCompleted {
        outcome: Outcome<Scenario>,
        at: TimestampMs,
    },
}

impl DomainEvent {
    /// Timestamp the event was emitted at
    pub fn timestamp(&self) -> TimestampMs {
        match self {
            DomainEvent::ScenarioStarted { at, .. }
            | DomainEvent::StepStarted { at, .. }
            | DomainEvent::StepCompleted { at, .. }
            | DomainEvent::ScenarioCompleted { at, .. } => *at,
        }
    }

    /// Short name used in log output
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            DomainEvent::ScenarioStarted { .. } => "scenario_started",
            DomainEvent::StepStarted { .. } => "step_started",
            DomainEvent::StepCompleted { .. } => "step_completed",
            DomainEvent::ScenarioCompleted { .. } => "scenario_completed",
        }
    }
}
