// plan.rs — GoalPlan: a goal's full node and edge set, loaded as one unit.
//
// Every engine operation loads the whole plan once, works against this
// in-memory structure, and persists it in one batch — one read, one
// write, instead of many small queries interleaved with cascade logic.
// Goals have tens of nodes, so the whole plan is cheap to hold.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ql_graph::DependencyGraph;
use ql_plan::{Goal, Node, NodeStatus};

use crate::error::EngineError;

/// One goal's complete plan: the goal, its nodes, and its edges.
///
/// This is both the unit of persistence and the in-memory arena the
/// accessibility evaluator and cascade orchestrator work against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPlan {
    /// The owning goal.
    pub goal: Goal,

    /// All nodes in the plan.
    pub nodes: Vec<Node>,

    /// The dependency edge set.
    pub graph: DependencyGraph,
}

impl GoalPlan {
    /// Create a plan from a goal and its nodes, with no edges.
    pub fn new(goal: Goal, nodes: Vec<Node>) -> Self {
        Self {
            goal,
            nodes,
            graph: DependencyGraph::new(),
        }
    }

    /// Look up a node by id.
    pub fn node(&self, node_id: Uuid) -> Result<&Node, EngineError> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or(EngineError::NodeNotFound(node_id))
    }

    /// Look up a node by id, mutably.
    pub fn node_mut(&mut self, node_id: Uuid) -> Result<&mut Node, EngineError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or(EngineError::NodeNotFound(node_id))
    }

    /// Whether a node with this id belongs to the plan.
    pub fn contains_node(&self, node_id: Uuid) -> bool {
        self.nodes.iter().any(|n| n.id == node_id)
    }

    /// Other members of a node's parallel group (same group, different id).
    pub fn parallel_siblings(&self, node: &Node) -> Vec<&Node> {
        match node.parallel_group {
            Some(group) => self
                .nodes
                .iter()
                .filter(|n| n.parallel_group == Some(group) && n.id != node.id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether every node in the plan is completed.
    pub fn all_nodes_completed(&self) -> bool {
        self.nodes.iter().all(|n| n.status == NodeStatus::Completed)
    }
}
