//! # ql-graph
//!
//! Per-goal dependency graph for the Questline unlock engine.
//!
//! A goal's plan is gated by directed edges `node → depends_on`. This
//! crate owns the edge set for one goal and guarantees its structural
//! invariants: no self-loops, no duplicate ordered pairs, and no cycles.
//! The cycle check runs against the graph as it exists *before* a
//! candidate edge is committed, so an invalid edge never becomes visible.
//!
//! ## Key components
//!
//! - [`DependencyEdge`] / [`DependencyKind`] — the directed relation and
//!   its three semantics (finish-to-start, start-to-start, finish-to-finish)
//! - [`DependencyGraph`] — one goal's edge set with both-direction lookups
//! - [`cycle::would_create_cycle`] — the pre-commit reachability check
//! - [`GraphError`] — structural rejection errors

pub mod cycle;
pub mod edge;
pub mod error;
pub mod graph;

pub use edge::{DependencyEdge, DependencyKind};
pub use error::GraphError;
pub use graph::DependencyGraph;
