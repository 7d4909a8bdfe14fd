// edge.rs — Dependency edges and their three gating semantics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a dependency gates the dependent node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// The depended-on node must be fully completed before this node
    /// can start.
    FinishToStart,

    /// The depended-on node only has to have started (active or
    /// completed) before this node can start.
    StartToStart,

    /// Constrains finishing together, not starting — has no start-time
    /// effect and never blocks accessibility.
    FinishToFinish,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::FinishToStart => write!(f, "finish_to_start"),
            DependencyKind::StartToStart => write!(f, "start_to_start"),
            DependencyKind::FinishToFinish => write!(f, "finish_to_finish"),
        }
    }
}

/// A directed dependency: `node_id` depends on `depends_on_id`.
///
/// Edges are never mutated in place — a kind change is modeled as
/// remove + add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The dependent node (the one being gated).
    pub node_id: Uuid,

    /// The node it depends on.
    pub depends_on_id: Uuid,

    /// How the dependency gates the dependent.
    pub kind: DependencyKind,

    /// When this edge was created.
    pub created_at: DateTime<Utc>,
}

impl DependencyEdge {
    pub fn new(node_id: Uuid, depends_on_id: Uuid, kind: DependencyKind) -> Self {
        Self {
            node_id,
            depends_on_id,
            kind,
            created_at: Utc::now(),
        }
    }
}
