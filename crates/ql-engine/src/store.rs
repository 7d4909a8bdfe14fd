// store.rs — PlanStore: persistence for goal plans.
//
// Each plan is stored as a JSON file: `<store_dir>/<goal_id>.json`.
// The engine loads a plan once per operation and writes it back in one
// batch; nothing is persisted until the operation has fully succeeded,
// which is what makes a failed operation effect-free.
//
// The trait exists so the surrounding CRUD layer can substitute a
// database-backed store without touching the engine.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::EngineError;
use crate::plan::GoalPlan;

/// Storage seam for goal plans.
pub trait PlanStore: Send + Sync {
    /// Load the plan for a goal, if one is stored.
    fn load(&self, goal_id: Uuid) -> Result<Option<GoalPlan>, EngineError>;

    /// Persist a plan (creates or overwrites) in one batch.
    fn save(&self, plan: &GoalPlan) -> Result<(), EngineError>;
}

/// Plan store backed by one JSON file per goal.
///
/// Simple but effective — easy to inspect manually, no database needed.
pub struct JsonPlanStore {
    store_dir: PathBuf,
}

impl JsonPlanStore {
    /// Create a new store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(store_dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir).map_err(|source| EngineError::Io {
            path: store_dir.display().to_string(),
            source,
        })?;
        Ok(Self { store_dir })
    }

    /// Path to the JSON file for a given goal.
    fn plan_file(&self, goal_id: Uuid) -> PathBuf {
        self.store_dir.join(format!("{}.json", goal_id))
    }
}

impl PlanStore for JsonPlanStore {
    fn load(&self, goal_id: Uuid) -> Result<Option<GoalPlan>, EngineError> {
        let path = self.plan_file(goal_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let plan: GoalPlan = serde_json::from_str(&json)?;
        Ok(Some(plan))
    }

    fn save(&self, plan: &GoalPlan) -> Result<(), EngineError> {
        let path = self.plan_file(plan.goal.id);
        let json = serde_json::to_string_pretty(plan)?;
        fs::write(&path, json).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}
