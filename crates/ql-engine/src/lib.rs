//! # ql-engine
//!
//! The Questline node dependency & unlock engine.
//!
//! A goal's plan is a directed graph of steps. This crate decides which
//! steps can be interacted with, enforces execution order, and — when a
//! step completes — propagates every consequence: unlocking dependents,
//! opening parallel groups, releasing time-locked messages, and closing
//! out the goal.
//!
//! ## Key components
//!
//! - [`UnlockEngine`] — the atomic, goal-scoped public surface
//!   (`add_dependency`, `remove_dependency`, `evaluate_accessibility`,
//!   `complete_node`)
//! - [`GoalPlan`] — a goal's full node + edge set, loaded once per
//!   operation and persisted in one batch
//! - [`access`] — the pure accessibility evaluator with blocker reporting
//! - [`cascade`] — the completion cascade orchestrator
//! - [`Effect`] / [`EffectDispatcher`] — side effects as data, executed
//!   against the collaborator traits after the batch commits
//! - [`PlanStore`] / [`JsonPlanStore`] — the persistence seam
//!
//! The engine owns no wire format or CLI; it is a library invoked by
//! the surrounding HTTP layer.

pub mod access;
pub mod cascade;
pub mod effects;
pub mod engine;
pub mod error;
pub mod plan;
pub mod store;

pub use access::Accessibility;
pub use cascade::CascadeOutcome;
pub use effects::{
    Effect, EffectDispatcher, EffectError, FollowerNotifier, GoalRepository, NoopCollaborator,
    RewardLedger, TimeCapsuleStore,
};
pub use engine::UnlockEngine;
pub use error::EngineError;
pub use plan::GoalPlan;
pub use store::{JsonPlanStore, PlanStore};
