// goal.rs — Goal: the owning entity for a plan of nodes.
//
// The unlock engine reads goals and flips them to Completed when the last
// node finishes; everything else about goals (authoring, following,
// feeds) lives in the surrounding CRUD layer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The lifecycle status of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// In progress — at least one node is not yet completed.
    Active,

    /// Every owned node is completed.
    Completed,

    /// Abandoned by the owner.
    Abandoned,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// A goal — owns a set of nodes forming its plan.
///
/// Invariant: `status` becomes `Completed` exactly when every owned node
/// is completed; the cascade orchestrator enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier for this goal.
    pub id: Uuid,

    /// The user who owns this goal.
    pub owner_id: Uuid,

    /// Human-readable title (e.g., "Run a marathon").
    pub title: String,

    /// Current lifecycle status.
    pub status: GoalStatus,

    /// When this goal was completed, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// When this goal was created.
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new active goal.
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            status: GoalStatus::Active,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark this goal completed and stamp `completed_at`.
    pub fn mark_completed(&mut self) {
        self.status = GoalStatus::Completed;
        self.completed_at = Some(Utc::now());
    }
}
