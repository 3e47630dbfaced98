//! Report nodes, stored in an arena owned by the builder.
//!
//! Children are owned lists of node ids and the parent back-reference is
//! a plain id, so the tree carries no reference cycles. Detaching turns
//! the arena into owned trees that the serializer can consume.

use crate::model::{Scenario, TestResult, TimestampMs};
use crate::report::types::{ReportError, ReportResult};
use crate::screenshot::ScreenshotCapture;
use crate::trace::TestError;

/// Index of a node inside the builder's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Lifecycle state shared by scenario- and step-level nodes.
///
/// A node transitions exactly once, open to completed; `result`,
/// `duration` and `error` stay unset until then.
#[derive(Debug)]
pub(crate) struct NodeCore {
    pub started_at: TimestampMs,
    pub result: Option<TestResult>,
    pub error: Option<TestError>,
    pub duration: Option<i64>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl NodeCore {
    fn open(started_at: TimestampMs, parent: Option<NodeId>) -> Self {
        Self {
            started_at,
            result: None,
            error: None,
            duration: None,
            children: Vec::new(),
            parent,
        }
    }

    pub fn is_open(&self) -> bool {
        self.result.is_none()
    }
}

/// Node-kind specific data
#[derive(Debug)]
pub(crate) enum NodePayload {
    Scenario(Scenario),
    Step {
        description: String,
        screenshots: Vec<ScreenshotCapture>,
    },
}

/// One node of the in-flight report tree
#[derive(Debug)]
pub(crate) struct ReportNode {
    pub core: NodeCore,
    pub payload: NodePayload,
}

impl ReportNode {
    pub fn scenario(scenario: Scenario, started_at: TimestampMs) -> Self {
        Self {
            core: NodeCore::open(started_at, None),
            payload: NodePayload::Scenario(scenario),
        }
    }

    pub fn step(
        description: String,
        screenshots: Vec<ScreenshotCapture>,
        started_at: TimestampMs,
        parent: NodeId,
    ) -> Self {
        Self {
            core: NodeCore::open(started_at, Some(parent)),
            payload: NodePayload::Step {
                description,
                screenshots,
            },
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self.payload, NodePayload::Step { .. })
    }

    pub fn display_name(&self) -> &str {
        match &self.payload {
            NodePayload::Scenario(scenario) => &scenario.name,
            NodePayload::Step { description, .. } => description,
        }
    }

    /// The single finalizing write. Completing a node twice is a
    /// protocol violation.
    pub fn completed_with(
        &mut self,
        result: TestResult,
        error: Option<TestError>,
        at: TimestampMs,
    ) -> ReportResult<()> {
        if !self.core.is_open() {
            return Err(ReportError::AlreadyCompleted {
                name: self.display_name().to_string(),
            });
        }
        self.core.result = Some(result);
        self.core.error = error;
        self.core.duration = Some(at - self.core.started_at);
        Ok(())
    }
}

/// Arena holding every node created during one reduction pass
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<ReportNode>,
}

impl NodeArena {
    pub fn alloc(&mut self, node: ReportNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &ReportNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ReportNode {
        &mut self.nodes[id.0]
    }

    /// Consume the arena, detaching each root into an owned tree.
    /// Roots are returned in the order given, completed or not.
    pub fn into_trees(self, roots: &[NodeId]) -> Vec<ScenarioTree> {
        let mut slots: Vec<Option<ReportNode>> = self.nodes.into_iter().map(Some).collect();
        roots
            .iter()
            .filter_map(|id| detach_scenario(&mut slots, *id))
            .collect()
    }
}

/// A detached scenario report, ready for serialization
#[derive(Debug)]
pub struct ScenarioTree {
    pub scenario: Scenario,
    pub started_at: TimestampMs,
    pub result: Option<TestResult>,
    pub error: Option<TestError>,
    pub duration: Option<i64>,
    pub steps: Vec<StepTree>,
}

/// A detached step report, possibly holding nested steps
#[derive(Debug)]
pub struct StepTree {
    pub description: String,
    pub started_at: TimestampMs,
    pub result: Option<TestResult>,
    pub error: Option<TestError>,
    pub duration: Option<i64>,
    pub children: Vec<StepTree>,
    pub screenshots: Vec<ScreenshotCapture>,
}

fn detach_scenario(slots: &mut Vec<Option<ReportNode>>, id: NodeId) -> Option<ScenarioTree> {
    let ReportNode { core, payload } = slots.get_mut(id.0)?.take()?;
    let NodePayload::Scenario(scenario) = payload else {
        return None;
    };
    let steps = core
        .children
        .iter()
        .filter_map(|child| detach_step(slots, *child))
        .collect();
    Some(ScenarioTree {
        scenario,
        started_at: core.started_at,
        result: core.result,
        error: core.error,
        duration: core.duration,
        steps,
    })
}

fn detach_step(slots: &mut Vec<Option<ReportNode>>, id: NodeId) -> Option<StepTree> {
    let ReportNode { core, payload } = slots.get_mut(id.0)?.take()?;
    let NodePayload::Step {
        description,
        screenshots,
    } = payload
    else {
        return None;
    };
    let children = core
        .children
        .iter()
        .filter_map(|child| detach_step(slots, *child))
        .collect();
    Some(StepTree {
        description,
        started_at: core.started_at,
        result: core.result,
        error: core.error,
        duration: core.duration,
        children,
        screenshots,
    })
}
