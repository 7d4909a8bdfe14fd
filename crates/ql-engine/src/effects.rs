// effects.rs — Side effects as data, and the dispatcher that runs them.
//
// The cascade orchestrator never calls external collaborators directly.
// It produces a list of Effect values; the dispatcher executes them
// after the plan batch has been persisted. A collaborator failure is
// logged and swallowed — "this node is done" is never held hostage by
// an unrelated subsystem's availability.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A collaborator call failed. Non-fatal; logged at the dispatch boundary.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EffectError(pub String);

/// Points and streak bookkeeping (external collaborator).
pub trait RewardLedger: Send + Sync {
    fn award(&self, user_id: Uuid, amount: u32, reason: &str) -> Result<(), EffectError>;
    fn update_streak(&self, user_id: Uuid) -> Result<(), EffectError>;
}

/// Fan-out to a goal's followers (external collaborator).
pub trait FollowerNotifier: Send + Sync {
    fn notify_goal_followers(
        &self,
        goal_id: Uuid,
        event_kind: &str,
        summary: &str,
        payload: &serde_json::Value,
    ) -> Result<(), EffectError>;
}

/// Time-locked messages attached to nodes (external collaborator).
pub trait TimeCapsuleStore: Send + Sync {
    /// Unlock every capsule gated on this node's completion, returning
    /// the unlocked ids. An empty result is the common case.
    fn unlock_all_for_node(&self, node_id: Uuid) -> Result<Vec<Uuid>, EffectError>;
}

/// The goal entity's home (external collaborator, written through on
/// goal completion only).
pub trait GoalRepository: Send + Sync {
    fn mark_completed(&self, goal_id: Uuid) -> Result<(), EffectError>;
}

/// A side effect produced by the cascade, executed after commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Award points to a user.
    AwardPoints {
        user_id: Uuid,
        amount: u32,
        reason: String,
    },

    /// Bump the user's activity streak.
    UpdateStreak { user_id: Uuid },

    /// Notify a goal's followers of an event.
    NotifyFollowers {
        goal_id: Uuid,
        event_kind: String,
        summary: String,
        payload: serde_json::Value,
    },

    /// Release time-locked messages gated on a node's completion.
    UnlockCapsules { node_id: Uuid },

    /// Record the goal as completed in its home repository.
    MarkGoalCompleted { goal_id: Uuid },
}

/// Executes effects against the collaborator set.
///
/// Every failure is logged via `tracing::warn!` and swallowed; dispatch
/// never influences the caller's return value.
pub struct EffectDispatcher {
    rewards: Box<dyn RewardLedger>,
    notifier: Box<dyn FollowerNotifier>,
    capsules: Box<dyn TimeCapsuleStore>,
    goals: Box<dyn GoalRepository>,
}

impl EffectDispatcher {
    pub fn new(
        rewards: Box<dyn RewardLedger>,
        notifier: Box<dyn FollowerNotifier>,
        capsules: Box<dyn TimeCapsuleStore>,
        goals: Box<dyn GoalRepository>,
    ) -> Self {
        Self {
            rewards,
            notifier,
            capsules,
            goals,
        }
    }

    /// A dispatcher wired to no-op collaborators (embedding and tests).
    pub fn noop() -> Self {
        Self::new(
            Box::new(NoopCollaborator),
            Box::new(NoopCollaborator),
            Box::new(NoopCollaborator),
            Box::new(NoopCollaborator),
        )
    }

    /// Run every effect in order, logging and swallowing failures.
    pub fn dispatch(&self, effects: &[Effect]) {
        for effect in effects {
            if let Err(e) = self.dispatch_one(effect) {
                tracing::warn!(error = %e, ?effect, "effect dispatch failed");
            }
        }
    }

    fn dispatch_one(&self, effect: &Effect) -> Result<(), EffectError> {
        match effect {
            Effect::AwardPoints {
                user_id,
                amount,
                reason,
            } => self.rewards.award(*user_id, *amount, reason),
            Effect::UpdateStreak { user_id } => self.rewards.update_streak(*user_id),
            Effect::NotifyFollowers {
                goal_id,
                event_kind,
                summary,
                payload,
            } => self
                .notifier
                .notify_goal_followers(*goal_id, event_kind, summary, payload),
            Effect::UnlockCapsules { node_id } => {
                // Unlocked ids are reported to tracing only; an empty
                // result is ignored.
                let unlocked = self.capsules.unlock_all_for_node(*node_id)?;
                if !unlocked.is_empty() {
                    tracing::debug!(node_id = %node_id, count = unlocked.len(), "capsules unlocked");
                }
                Ok(())
            }
            Effect::MarkGoalCompleted { goal_id } => self.goals.mark_completed(*goal_id),
        }
    }
}

/// A collaborator that accepts everything and does nothing.
pub struct NoopCollaborator;

impl RewardLedger for NoopCollaborator {
    fn award(&self, _user_id: Uuid, _amount: u32, _reason: &str) -> Result<(), EffectError> {
        Ok(())
    }

    fn update_streak(&self, _user_id: Uuid) -> Result<(), EffectError> {
        Ok(())
    }
}

impl FollowerNotifier for NoopCollaborator {
    fn notify_goal_followers(
        &self,
        _goal_id: Uuid,
        _event_kind: &str,
        _summary: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), EffectError> {
        Ok(())
    }
}

impl TimeCapsuleStore for NoopCollaborator {
    fn unlock_all_for_node(&self, _node_id: Uuid) -> Result<Vec<Uuid>, EffectError> {
        Ok(Vec::new())
    }
}

impl GoalRepository for NoopCollaborator {
    fn mark_completed(&self, _goal_id: Uuid) -> Result<(), EffectError> {
        Ok(())
    }
}
