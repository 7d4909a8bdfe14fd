// access.rs — Accessibility: can this node be interacted with right now?
//
// Pure evaluation over a loaded plan — no writes, safe to call
// repeatedly. The rules apply in strict priority order; the first rule
// that decides wins:
//
//   1. Completed/Active nodes are always interactable (a user can
//      re-open an active or finished node).
//   2. Non-sequential nodes ignore the graph entirely.
//   3. A parallel group with any active/completed member makes every
//      member accessible regardless of its own edges.
//   4. With no edges, fall back to order-based gating against earlier
//      incomplete nodes.
//   5. Otherwise each edge gates by its kind; blockers are reported.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ql_graph::DependencyKind;
use ql_plan::NodeStatus;

use crate::error::EngineError;
use crate::plan::GoalPlan;

/// The result of an accessibility evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Accessibility {
    /// Whether the node can currently be interacted with.
    pub can_interact: bool,

    /// The nodes responsible for blocking, when it cannot.
    pub blocking_node_ids: Vec<Uuid>,
}

impl Accessibility {
    fn open() -> Self {
        Self {
            can_interact: true,
            blocking_node_ids: Vec::new(),
        }
    }

    fn blocked_by(blocking_node_ids: Vec<Uuid>) -> Self {
        Self {
            can_interact: false,
            blocking_node_ids,
        }
    }
}

/// Evaluate whether `node_id` can currently be interacted with.
pub fn evaluate(plan: &GoalPlan, node_id: Uuid) -> Result<Accessibility, EngineError> {
    let node = plan.node(node_id)?;

    // Rule 1: terminal/active states are always interactable.
    if matches!(node.status, NodeStatus::Completed | NodeStatus::Active) {
        return Ok(Accessibility::open());
    }

    // Rule 2: non-sequential nodes ignore the graph.
    if !node.is_sequential {
        return Ok(Accessibility::open());
    }

    // Rule 3: an active or completed member opens the whole parallel group.
    if node.parallel_group.is_some() {
        let group_open = plan.parallel_siblings(node).iter().any(|sibling| {
            matches!(
                sibling.status,
                NodeStatus::Active | NodeStatus::Completed
            )
        });
        if group_open {
            return Ok(Accessibility::open());
        }
    }

    let mut edges = plan.graph.dependencies_of(node_id).peekable();

    // Rule 4: no edges — order-based gating against earlier incomplete nodes.
    if edges.peek().is_none() {
        let blockers: Vec<Uuid> = plan
            .nodes
            .iter()
            .filter(|n| n.order < node.order && n.status != NodeStatus::Completed)
            .map(|n| n.id)
            .collect();
        return Ok(if blockers.is_empty() {
            Accessibility::open()
        } else {
            Accessibility::blocked_by(blockers)
        });
    }

    // Rule 5: per-edge gating by dependency kind.
    let mut blockers = Vec::new();
    for edge in edges {
        let dependency = plan.node(edge.depends_on_id)?;
        let blocking = match edge.kind {
            DependencyKind::FinishToStart => dependency.status != NodeStatus::Completed,
            DependencyKind::StartToStart => dependency.status == NodeStatus::Locked,
            DependencyKind::FinishToFinish => false,
        };
        if blocking {
            blockers.push(dependency.id);
        }
    }

    Ok(if blockers.is_empty() {
        Accessibility::open()
    } else {
        Accessibility::blocked_by(blockers)
    })
}
