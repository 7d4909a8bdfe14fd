// cycle.rs — Pre-commit cycle detection.
//
// Answers one question: would adding `node → depends_on` close a cycle?
// The check walks the dependency edges of `depends_on` — "what does the
// thing I'd depend on, itself depend on" — and rejects if the walk ever
// reaches `node`. It runs against the graph as it exists *before* the
// candidate edge is inserted.
//
// Deliberately an explicit worklist with a visited set allocated fresh
// per call, never shared across calls. The visited set also guarantees
// termination if the store ever holds malformed data that the invariants
// should have prevented.

use std::collections::HashSet;

use uuid::Uuid;

use crate::graph::DependencyGraph;

/// Whether adding the edge `node → depends_on` would create a cycle.
///
/// O(V+E) in the goal's graph; goals have bounded node counts (tens,
/// not thousands).
pub fn would_create_cycle(graph: &DependencyGraph, node: Uuid, depends_on: Uuid) -> bool {
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut worklist: Vec<Uuid> = vec![depends_on];

    while let Some(current) = worklist.pop() {
        if current == node {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        for edge in graph.dependencies_of(current) {
            worklist.push(edge.depends_on_id);
        }
    }

    false
}
