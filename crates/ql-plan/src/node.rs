// node.rs — Node: one step in a goal's plan, with its own status machine.
//
// A node's status only ever moves forward:
//   Locked → Active → Completed
//                   → Failed
// Backward moves are an administrative concern outside this engine.
//
// The state machine deliberately has no graph knowledge. Whether a node
// *may* be activated is decided by the accessibility evaluator in
// ql-engine; this type only enforces that the transition itself is legal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlanError;

/// The lifecycle status of a node.
///
/// A closed enum with exhaustive matching — status comparisons can never
/// silently typo the way stringly-typed statuses can.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Not yet reachable — waiting on dependencies or ordering.
    Locked,

    /// Unlocked and workable by the goal owner.
    Active,

    /// Done (terminal success).
    Completed,

    /// Given up (terminal; reachable administratively, ignored by cascades).
    Failed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Locked => write!(f, "locked"),
            NodeStatus::Active => write!(f, "active"),
            NodeStatus::Completed => write!(f, "completed"),
            NodeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One step in a goal's plan.
///
/// Nodes are created when a plan is authored (manually or by an external
/// planner) and are mutated only through the state machine methods here
/// and the cascade in `ql-engine`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: Uuid,

    /// The goal whose plan this node belongs to.
    pub goal_id: Uuid,

    /// Human-readable step title (e.g., "Run 5k without stopping").
    pub title: String,

    /// Position within the plan (1-based).
    pub order: i32,

    /// Current lifecycle status.
    pub status: NodeStatus,

    /// Whether this node participates in sequential gating at all.
    /// Non-sequential nodes ignore the dependency graph entirely.
    pub is_sequential: bool,

    /// Optional parallel group. All nodes in a goal sharing the same
    /// group value are unlock-equivalent: one active or completed member
    /// makes every member accessible regardless of its own edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_group: Option<i32>,

    /// Difficulty rating 1–5; drives the completion reward amount.
    pub difficulty: u8,

    /// When this node was completed, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// When this node was created.
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Create a new node with an explicit initial status.
    ///
    /// Difficulty is clamped to the 1–5 range.
    pub fn new(
        goal_id: Uuid,
        title: impl Into<String>,
        order: i32,
        status: NodeStatus,
        difficulty: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            title: title.into(),
            order,
            status,
            is_sequential: true,
            parallel_group: None,
            difficulty: difficulty.clamp(1, 5),
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Build a plan's node list from titles, first node active, rest locked.
    pub fn new_plan<I, S>(goal_id: Uuid, titles: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let status = if i == 0 {
                    NodeStatus::Active
                } else {
                    NodeStatus::Locked
                };
                Self::new(goal_id, title, (i + 1) as i32, status, 1)
            })
            .collect()
    }

    /// Mark this node completed. Requires `Active`.
    ///
    /// Stamps `completed_at`. Does not unlock dependents — propagation is
    /// the cascade orchestrator's job.
    pub fn complete(&mut self) -> Result<(), PlanError> {
        if self.status != NodeStatus::Active {
            return Err(PlanError::NodeNotActive {
                node_id: self.id,
                status: self.status,
            });
        }
        self.status = NodeStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Unlock this node. Requires `Locked`.
    ///
    /// Callers that want idempotent behavior should check status first and
    /// no-op on `Active`/`Completed` rather than treat this as an error.
    pub fn activate(&mut self) -> Result<(), PlanError> {
        if self.status != NodeStatus::Locked {
            return Err(PlanError::NodeNotLocked {
                node_id: self.id,
                status: self.status,
            });
        }
        self.status = NodeStatus::Active;
        Ok(())
    }

    /// Mark this node failed. Requires `Active`.
    ///
    /// Terminal administrative transition; the cascade never takes it.
    pub fn fail(&mut self) -> Result<(), PlanError> {
        if self.status != NodeStatus::Active {
            return Err(PlanError::NodeNotActive {
                node_id: self.id,
                status: self.status,
            });
        }
        self.status = NodeStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_node() -> Node {
        Node::new(Uuid::new_v4(), "Step", 1, NodeStatus::Active, 3)
    }

    #[test]
    fn new_plan_first_node_active_rest_locked() {
        let goal_id = Uuid::new_v4();
        let nodes = Node::new_plan(goal_id, ["a", "b", "c"]);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].status, NodeStatus::Active);
        assert_eq!(nodes[1].status, NodeStatus::Locked);
        assert_eq!(nodes[2].status, NodeStatus::Locked);
        assert_eq!(nodes[0].order, 1);
        assert_eq!(nodes[2].order, 3);
        assert!(nodes.iter().all(|n| n.goal_id == goal_id));
    }

    #[test]
    fn complete_active_node_stamps_completed_at() {
        let mut node = active_node();
        assert!(node.completed_at.is_none());
        node.complete().unwrap();
        assert_eq!(node.status, NodeStatus::Completed);
        assert!(node.completed_at.is_some());
    }

    #[test]
    fn complete_locked_node_is_rejected() {
        let mut node = Node::new(Uuid::new_v4(), "Step", 2, NodeStatus::Locked, 1);
        let result = node.complete();
        assert!(matches!(
            result,
            Err(PlanError::NodeNotActive {
                status: NodeStatus::Locked,
                ..
            })
        ));
        // State unchanged.
        assert_eq!(node.status, NodeStatus::Locked);
        assert!(node.completed_at.is_none());
    }

    #[test]
    fn complete_completed_node_is_rejected() {
        let mut node = active_node();
        node.complete().unwrap();
        let first_stamp = node.completed_at;
        let result = node.complete();
        assert!(matches!(result, Err(PlanError::NodeNotActive { .. })));
        assert_eq!(node.completed_at, first_stamp);
    }

    #[test]
    fn activate_locked_node() {
        let mut node = Node::new(Uuid::new_v4(), "Step", 2, NodeStatus::Locked, 1);
        node.activate().unwrap();
        assert_eq!(node.status, NodeStatus::Active);
    }

    #[test]
    fn activate_active_node_is_rejected() {
        let mut node = active_node();
        let result = node.activate();
        assert!(matches!(
            result,
            Err(PlanError::NodeNotLocked {
                status: NodeStatus::Active,
                ..
            })
        ));
    }

    #[test]
    fn fail_only_from_active() {
        let mut node = active_node();
        node.fail().unwrap();
        assert_eq!(node.status, NodeStatus::Failed);

        let mut locked = Node::new(Uuid::new_v4(), "Step", 2, NodeStatus::Locked, 1);
        assert!(locked.fail().is_err());
    }

    #[test]
    fn difficulty_is_clamped() {
        let low = Node::new(Uuid::new_v4(), "Step", 1, NodeStatus::Active, 0);
        let high = Node::new(Uuid::new_v4(), "Step", 1, NodeStatus::Active, 9);
        assert_eq!(low.difficulty, 1);
        assert_eq!(high.difficulty, 5);
    }

    #[test]
    fn status_display_format() {
        assert_eq!(NodeStatus::Locked.to_string(), "locked");
        assert_eq!(NodeStatus::Active.to_string(), "active");
        assert_eq!(NodeStatus::Completed.to_string(), "completed");
        assert_eq!(NodeStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn serialization_round_trip() {
        let mut node = active_node();
        node.parallel_group = Some(2);
        let json = serde_json::to_string_pretty(&node).unwrap();
        assert!(json.contains("\"active\""));
        let restored: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, node.id);
        assert_eq!(restored.status, NodeStatus::Active);
        assert_eq!(restored.parallel_group, Some(2));
    }

    #[test]
    fn parallel_group_none_omitted_from_json() {
        let node = active_node();
        let json = serde_json::to_string_pretty(&node).unwrap();
        assert!(!json.contains("parallel_group"));
        let restored: Node = serde_json::from_str(&json).unwrap();
        assert!(restored.parallel_group.is_none());
    }
}
