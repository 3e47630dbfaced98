//! The event fold that reconstructs report trees.
//!
//! A left-fold over the ordered event stream. One cursor tracks the node
//! currently accepting nested events; a scenario-id map keeps every root
//! until extraction. The fold is synchronous and assumes the stream
//! interleaves no two scenarios (single-cursor invariant).

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::events::DomainEvent;
use crate::report::json;
use crate::report::node::{NodeArena, NodeId, NodePayload, ReportNode, ScenarioTree};
use crate::report::types::{ReportError, ReportResult};

/// Folds domain events into per-scenario report trees.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    arena: NodeArena,
    /// Scenario id -> root node, kept until extraction
    index: HashMap<String, NodeId>,
    /// Roots in the order their scenarios started
    roots: Vec<NodeId>,
    /// The node currently accepting nested events
    cursor: Option<NodeId>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an entire event sequence. Stops at the first protocol
    /// violation, since the cursor state is undefined past that point.
    pub fn reduce(events: impl IntoIterator<Item = DomainEvent>) -> ReportResult<Self> {
        let mut builder = Self::new();
        for event in events {
            builder.process(event)?;
        }
        Ok(builder)
    }

    /// Apply a single event to the in-flight tree
    pub fn process(&mut self, event: DomainEvent) -> ReportResult<()> {
        debug!(kind = event.kind(), at = event.timestamp(), "processing event");
        match event {
            DomainEvent::ScenarioStarted { scenario, at } => {
                let scenario_id = scenario.id.clone();
                let id = self.arena.alloc(ReportNode::scenario(scenario, at));
                self.index.insert(scenario_id, id);
                self.roots.push(id);
                self.cursor = Some(id);
                Ok(())
            }

            DomainEvent::StepStarted { step, at } => {
                let parent = match self.cursor {
                    Some(id) if self.arena.get(id).core.is_open() => id,
                    _ => {
                        return Err(ReportError::StepWithoutOpenNode { step: step.name });
                    }
                };
                let node = ReportNode::step(step.name, step.screenshots, at, parent);
                let id = self.arena.alloc(node);
                self.arena.get_mut(parent).core.children.push(id);
                self.cursor = Some(id);
                Ok(())
            }

            DomainEvent::StepCompleted { outcome, at } => {
                let id = match self.cursor {
                    Some(id) if self.arena.get(id).is_step() && self.arena.get(id).core.is_open() => id,
                    _ => {
                        return Err(ReportError::UnexpectedStepCompletion {
                            step: outcome.subject.name,
                        });
                    }
                };
                let node = self.arena.get_mut(id);
                node.completed_with(outcome.result, outcome.error, at)?;
                // Captures produced while the step ran join the ones
                // attached at start, in order.
                if let NodePayload::Step { screenshots, .. } = &mut node.payload {
                    screenshots.extend(outcome.subject.screenshots);
                }
                self.cursor = node.core.parent;
                Ok(())
            }

            DomainEvent::ScenarioCompleted { outcome, at } => {
                let id = *self
                    .index
                    .get(&outcome.subject.id)
                    .ok_or(ReportError::UnknownScenario {
                        id: outcome.subject.id.clone(),
                    })?;
                self.arena
                    .get_mut(id)
                    .completed_with(outcome.result, outcome.error, at)
            }
        }
    }

    /// Number of scenarios observed so far
    pub fn scenario_count(&self) -> usize {
        self.roots.len()
    }

    /// Detach every scenario into an owned tree, completed or not
    pub fn into_trees(self) -> Vec<ScenarioTree> {
        self.arena.into_trees(&self.roots)
    }

    /// Serialize every scenario report, one concurrent task per root.
    /// The first failing screenshot capture fails the whole extraction.
    pub async fn into_json(self) -> ReportResult<Vec<Value>> {
        let trees = self.into_trees();
        debug!(scenarios = trees.len(), "serializing reports");
        futures::future::try_join_all(trees.into_iter().map(json::scenario_to_json)).await
    }
}

/// Reduce a finite event sequence and serialize every observed scenario.
///
/// The convenience entry point for callers that hold the whole stream:
/// equivalent to [`ReportBuilder::reduce`] followed by
/// [`ReportBuilder::into_json`].
pub async fn extract_reports(
    events: impl IntoIterator<Item = DomainEvent>,
) -> ReportResult<Vec<Value>> {
    ReportBuilder::reduce(events)?.into_json().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Outcome, Scenario, Step, TestResult};
    use crate::trace::TestError;

    fn scenario(id: &str) -> Scenario {
        Scenario::new(id, format!("scenario {}", id), "UserLoginFeature", "features/login.rs")
    }

    #[test]
    fn test_canonical_sequence_populates_durations() {
        let s = scenario("s-1");
        let builder = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s.clone(), at: 1_000 },
            DomainEvent::StepStarted { step: Step::new("opens the page"), at: 1_010 },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("opens the page"), TestResult::Success),
                at: 1_250,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s, TestResult::Success),
                at: 1_400,
            },
        ])
        .unwrap();

        let trees = builder.into_trees();
        assert_eq!(trees.len(), 1);
        let tree = &trees[0];
        assert_eq!(tree.duration, Some(400));
        assert_eq!(tree.result, Some(TestResult::Success));
        assert_eq!(tree.steps.len(), 1);
        assert_eq!(tree.steps[0].duration, Some(240));
    }

    #[test]
    fn test_nested_steps_keep_start_order() {
        let s = scenario("s-1");
        let builder = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s.clone(), at: 0 },
            DomainEvent::StepStarted { step: Step::new("a"), at: 1 },
            DomainEvent::StepStarted { step: Step::new("b"), at: 2 },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("b"), TestResult::Success),
                at: 3,
            },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("a"), TestResult::Success),
                at: 4,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s, TestResult::Success),
                at: 5,
            },
        ])
        .unwrap();

        let trees = builder.into_trees();
        let steps = &trees[0].steps;
        assert_eq!(steps.len(), 1, "b must not be a sibling of a");
        assert_eq!(steps[0].description, "a");
        assert_eq!(steps[0].children.len(), 1);
        assert_eq!(steps[0].children[0].description, "b");
        assert!(steps[0].children[0].children.is_empty());
    }

    #[test]
    fn test_two_sequential_scenarios_stay_independent() {
        let s1 = scenario("s-1");
        let s2 = scenario("s-2");
        let builder = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s1.clone(), at: 0 },
            DomainEvent::StepStarted { step: Step::new("first step"), at: 1 },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("first step"), TestResult::Success),
                at: 2,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s1, TestResult::Success),
                at: 3,
            },
            DomainEvent::ScenarioStarted { scenario: s2.clone(), at: 10 },
            DomainEvent::StepStarted { step: Step::new("second step"), at: 11 },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("second step"), TestResult::Failure),
                at: 12,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s2, TestResult::Failure),
                at: 13,
            },
        ])
        .unwrap();

        let trees = builder.into_trees();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].steps.len(), 1);
        assert_eq!(trees[0].steps[0].description, "first step");
        assert_eq!(trees[1].steps.len(), 1);
        assert_eq!(trees[1].steps[0].description, "second step");
        assert_eq!(trees[1].result, Some(TestResult::Failure));
    }

    #[test]
    fn test_step_completion_without_open_step_aborts() {
        let err = ReportBuilder::reduce(vec![DomainEvent::StepCompleted {
            outcome: Outcome::new(Step::new("ghost"), TestResult::Success),
            at: 1,
        }])
        .unwrap_err();
        assert!(matches!(err, ReportError::UnexpectedStepCompletion { .. }));
    }

    #[test]
    fn test_step_completion_with_only_scenario_open_aborts() {
        let s = scenario("s-1");
        let err = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s, at: 0 },
            DomainEvent::StepCompleted {
                outcome: Outcome::new(Step::new("ghost"), TestResult::Success),
                at: 1,
            },
        ])
        .unwrap_err();
        assert!(matches!(err, ReportError::UnexpectedStepCompletion { .. }));
    }

    #[test]
    fn test_completion_for_unknown_scenario_aborts() {
        let err = ReportBuilder::reduce(vec![DomainEvent::ScenarioCompleted {
            outcome: Outcome::new(scenario("never-started"), TestResult::Success),
            at: 1,
        }])
        .unwrap_err();
        assert!(matches!(err, ReportError::UnknownScenario { .. }));
    }

    #[test]
    fn test_step_after_completed_scenario_aborts() {
        let s = scenario("s-1");
        let err = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s.clone(), at: 0 },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s, TestResult::Success),
                at: 1,
            },
            DomainEvent::StepStarted { step: Step::new("late"), at: 2 },
        ])
        .unwrap_err();
        assert!(matches!(err, ReportError::StepWithoutOpenNode { .. }));
    }

    #[test]
    fn test_double_scenario_completion_aborts() {
        let s = scenario("s-1");
        let err = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s.clone(), at: 0 },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s.clone(), TestResult::Success),
                at: 1,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::new(s, TestResult::Failure),
                at: 2,
            },
        ])
        .unwrap_err();
        assert!(matches!(err, ReportError::AlreadyCompleted { .. }));
    }

    #[test]
    fn test_incomplete_scenario_is_still_extracted() {
        let builder = ReportBuilder::reduce(vec![DomainEvent::ScenarioStarted {
            scenario: scenario("s-1"),
            at: 0,
        }])
        .unwrap();
        let trees = builder.into_trees();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].result, None);
        assert_eq!(trees[0].duration, None);
    }

    #[test]
    fn test_errors_travel_with_outcomes() {
        let s = scenario("s-1");
        let builder = ReportBuilder::reduce(vec![
            DomainEvent::ScenarioStarted { scenario: s.clone(), at: 0 },
            DomainEvent::StepStarted { step: Step::new("asserts the total"), at: 1 },
            DomainEvent::StepCompleted {
                outcome: Outcome::with_error(
                    Step::new("asserts the total"),
                    TestResult::Failure,
                    TestError::new("AssertionError", "expected 3, found 2"),
                ),
                at: 2,
            },
            DomainEvent::ScenarioCompleted {
                outcome: Outcome::with_error(
                    s,
                    TestResult::Failure,
                    TestError::new("AssertionError", "expected 3, found 2"),
                ),
                at: 3,
            },
        ])
        .unwrap();

        let trees = builder.into_trees();
        assert!(trees[0].error.is_some());
        assert!(trees[0].steps[0].error.is_some());
    }

    #[tokio::test]
    async fn test_extraction_over_zero_events_is_empty() {
        let reports = extract_reports(Vec::new()).await.unwrap();
        assert!(reports.is_empty());
    }
}
