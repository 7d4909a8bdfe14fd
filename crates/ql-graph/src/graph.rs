// graph.rs — DependencyGraph: one goal's edge set.
//
// All lookups are scoped to a single goal; callers reject cross-goal
// edges before they reach this store. Both traversal directions are
// served from the same flat edge list — goals have tens of nodes, not
// thousands, so linear scans beat maintaining twin adjacency maps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cycle;
use crate::edge::{DependencyEdge, DependencyKind};
use crate::error::GraphError;

/// The dependency edge set for a single goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from persisted edges.
    pub fn from_edges(edges: Vec<DependencyEdge>) -> Self {
        Self { edges }
    }

    /// Add an edge `node_id → depends_on_id`.
    ///
    /// Checks, in order: self-loop, duplicate ordered pair, cycle. The
    /// cycle check runs against the graph *before* the candidate edge is
    /// inserted, so rejection leaves the store untouched.
    pub fn add_edge(
        &mut self,
        node_id: Uuid,
        depends_on_id: Uuid,
        kind: DependencyKind,
    ) -> Result<DependencyEdge, GraphError> {
        if node_id == depends_on_id {
            return Err(GraphError::SelfDependency(node_id));
        }
        if self.contains_edge(node_id, depends_on_id) {
            return Err(GraphError::DuplicateEdge {
                node_id,
                depends_on_id,
            });
        }
        if cycle::would_create_cycle(self, node_id, depends_on_id) {
            return Err(GraphError::CycleDetected {
                node_id,
                depends_on_id,
            });
        }

        let edge = DependencyEdge::new(node_id, depends_on_id, kind);
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Remove the edge `node_id → depends_on_id`, returning it.
    pub fn remove_edge(
        &mut self,
        node_id: Uuid,
        depends_on_id: Uuid,
    ) -> Result<DependencyEdge, GraphError> {
        let position = self
            .edges
            .iter()
            .position(|e| e.node_id == node_id && e.depends_on_id == depends_on_id)
            .ok_or(GraphError::EdgeNotFound {
                node_id,
                depends_on_id,
            })?;
        Ok(self.edges.remove(position))
    }

    /// Whether an edge exists for the ordered pair.
    pub fn contains_edge(&self, node_id: Uuid, depends_on_id: Uuid) -> bool {
        self.edges
            .iter()
            .any(|e| e.node_id == node_id && e.depends_on_id == depends_on_id)
    }

    /// Edges where `node_id` is the dependent — what it depends on.
    pub fn dependencies_of(&self, node_id: Uuid) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.node_id == node_id)
    }

    /// Edges where `node_id` is the target — what depends on it.
    ///
    /// Used by the cascade to find nodes to re-evaluate after a
    /// completion.
    pub fn dependents_of(&self, node_id: Uuid) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.depends_on_id == node_id)
    }

    /// All edges in the graph.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
