//! # ql-plan
//!
//! Node and goal domain types for the Questline unlock engine.
//!
//! A goal's plan is a list of [`Node`]s. Each node carries its own
//! lock/unlock state machine (Locked → Active → Completed, or → Failed
//! from Active). The state machine knows nothing about the dependency
//! graph — unlocking decisions live in `ql-engine`, which keeps this
//! crate a pure leaf.
//!
//! ## Key components
//!
//! - [`Node`] — one step in a goal's plan, with status, ordering, and
//!   parallel-group attributes
//! - [`NodeStatus`] — the closed status enum, exhaustively matched everywhere
//! - [`Goal`] — the owning entity, referenced read-only by the engine
//! - [`PlanError`] — state-violation errors (`NodeNotActive`, `NodeNotLocked`)

pub mod error;
pub mod goal;
pub mod node;

pub use error::PlanError;
pub use goal::{Goal, GoalStatus};
pub use node::{Node, NodeStatus};
