// error.rs — Error types for the plan subsystem.

use thiserror::Error;
use uuid::Uuid;

use crate::node::NodeStatus;

/// Errors that can occur during node state transitions.
///
/// These are state violations: the requested transition is invalid given
/// the node's current status. They are deterministic and caller-facing —
/// idempotent callers should check status first rather than rely on them.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Completion (or failure) was requested on a node that is not active.
    #[error("node {node_id} is {status}, not active")]
    NodeNotActive { node_id: Uuid, status: NodeStatus },

    /// Activation was requested on a node that is not locked.
    #[error("node {node_id} is {status}, not locked")]
    NodeNotLocked { node_id: Uuid, status: NodeStatus },
}
