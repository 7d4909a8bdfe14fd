// error.rs — Error types for the unlock engine.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by engine operations.
///
/// Structural rejections ([`ql_graph::GraphError`]) and state violations
/// ([`ql_plan::PlanError`]) pass through verbatim; storage and
/// serialization failures are the generic fatal class — the whole
/// operation is abandoned with nothing persisted.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No plan is stored for the requested goal.
    #[error("no plan found for goal {0}")]
    PlanNotFound(Uuid),

    /// The requested node is not part of the goal's plan.
    #[error("node {0} is not part of this goal's plan")]
    NodeNotFound(Uuid),

    /// A graph mutation was structurally invalid.
    #[error(transparent)]
    Graph(#[from] ql_graph::GraphError),

    /// A node state transition was invalid.
    #[error(transparent)]
    Plan(#[from] ql_plan::PlanError),

    /// Failed to serialize/deserialize a stored plan.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
