// error.rs — Error types for the dependency graph subsystem.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during graph mutations.
///
/// These are structural rejections: the requested mutation is invalid and
/// has no partial effect. They are surfaced verbatim to the caller.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node cannot depend on itself.
    #[error("node {0} cannot depend on itself")]
    SelfDependency(Uuid),

    /// An edge for this ordered pair already exists.
    #[error("dependency from {node_id} on {depends_on_id} already exists")]
    DuplicateEdge { node_id: Uuid, depends_on_id: Uuid },

    /// Adding the edge would create a cycle in the goal's graph.
    #[error("dependency from {node_id} on {depends_on_id} would create a cycle")]
    CycleDetected { node_id: Uuid, depends_on_id: Uuid },

    /// The edge to remove does not exist.
    #[error("no dependency from {node_id} on {depends_on_id}")]
    EdgeNotFound { node_id: Uuid, depends_on_id: Uuid },
}
