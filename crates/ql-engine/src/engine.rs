// engine.rs — UnlockEngine: the goal-scoped, serialized public surface.
//
// Every operation follows the same shape: take the goal's lock, load
// the plan once, check and mutate in memory, persist in one batch,
// release the lock, then dispatch effects. Holding the lock across
// load → check → mutate → persist closes the check-then-act race (two
// concurrent add_dependency calls that would jointly create a cycle)
// and prevents an add_dependency from interleaving mid-cascade.
//
// Effects run after the batch commits and after the lock drops —
// collaborators are external and must not stall the goal's graph.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use ql_graph::{DependencyEdge, DependencyKind};

use crate::access::{self, Accessibility};
use crate::cascade::{self, CascadeOutcome};
use crate::effects::EffectDispatcher;
use crate::error::EngineError;
use crate::plan::GoalPlan;
use crate::store::PlanStore;

/// The node dependency & unlock engine.
///
/// A synchronous library invoked per request by the surrounding CRUD
/// layer; each public operation is atomic and serialized per goal.
pub struct UnlockEngine<S: PlanStore> {
    store: S,
    dispatcher: EffectDispatcher,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: PlanStore> UnlockEngine<S> {
    pub fn new(store: S, dispatcher: EffectDispatcher) -> Self {
        Self {
            store,
            dispatcher,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Add a dependency edge `node_id → depends_on_id` to a goal's graph.
    ///
    /// Rejects self-loops, duplicate pairs, cross-goal nodes, and edges
    /// that would create a cycle. Nothing is persisted on rejection.
    pub fn add_dependency(
        &self,
        goal_id: Uuid,
        node_id: Uuid,
        depends_on_id: Uuid,
        kind: DependencyKind,
    ) -> Result<DependencyEdge, EngineError> {
        let lock = self.goal_lock(goal_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut plan = self.load_plan(goal_id)?;
        // Cross-goal edges are rejected here, as a precondition the
        // graph store itself doesn't know about.
        self.require_node(&plan, node_id)?;
        self.require_node(&plan, depends_on_id)?;

        let edge = plan.graph.add_edge(node_id, depends_on_id, kind)?;
        self.store.save(&plan)?;
        Ok(edge)
    }

    /// Remove the dependency edge `node_id → depends_on_id`.
    pub fn remove_dependency(
        &self,
        goal_id: Uuid,
        node_id: Uuid,
        depends_on_id: Uuid,
    ) -> Result<(), EngineError> {
        let lock = self.goal_lock(goal_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut plan = self.load_plan(goal_id)?;
        plan.graph.remove_edge(node_id, depends_on_id)?;
        self.store.save(&plan)?;
        Ok(())
    }

    /// Evaluate whether a node can currently be interacted with.
    pub fn evaluate_accessibility(
        &self,
        goal_id: Uuid,
        node_id: Uuid,
    ) -> Result<Accessibility, EngineError> {
        let lock = self.goal_lock(goal_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let plan = self.load_plan(goal_id)?;
        access::evaluate(&plan, node_id)
    }

    /// Complete a node and run the full cascade.
    ///
    /// The plan batch persists before any effect runs; effect failures
    /// are logged and swallowed and never change the outcome.
    pub fn complete_node(
        &self,
        goal_id: Uuid,
        node_id: Uuid,
    ) -> Result<CascadeOutcome, EngineError> {
        let outcome = {
            let lock = self.goal_lock(goal_id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

            let mut plan = self.load_plan(goal_id)?;
            let outcome = cascade::run(&mut plan, node_id)?;
            self.store.save(&plan)?;
            outcome
        };

        self.dispatcher.dispatch(&outcome.effects);
        Ok(outcome)
    }

    fn load_plan(&self, goal_id: Uuid) -> Result<GoalPlan, EngineError> {
        self.store
            .load(goal_id)?
            .ok_or(EngineError::PlanNotFound(goal_id))
    }

    fn require_node(&self, plan: &GoalPlan, node_id: Uuid) -> Result<(), EngineError> {
        if plan.contains_node(node_id) {
            Ok(())
        } else {
            Err(EngineError::NodeNotFound(node_id))
        }
    }

    /// The exclusive lock for one goal, created on first use.
    fn goal_lock(&self, goal_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(goal_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use tempfile::tempdir;

    use ql_graph::GraphError;
    use ql_plan::{Goal, Node, NodeStatus, PlanError};

    use crate::store::JsonPlanStore;

    fn engine_with_plan(
        titles: &[&str],
    ) -> (UnlockEngine<JsonPlanStore>, GoalPlan, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = JsonPlanStore::new(dir.path().join("plans")).unwrap();

        let goal = Goal::new(Uuid::new_v4(), "Engine goal");
        let nodes = Node::new_plan(goal.id, titles.iter().copied());
        let plan = GoalPlan::new(goal, nodes);
        store.save(&plan).unwrap();

        (
            UnlockEngine::new(store, EffectDispatcher::noop()),
            plan,
            dir,
        )
    }

    #[test]
    fn add_dependency_persists_the_edge() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b"]);
        let a = plan.nodes[0].id;
        let b = plan.nodes[1].id;

        let edge = engine
            .add_dependency(plan.goal.id, b, a, DependencyKind::FinishToStart)
            .unwrap();
        assert_eq!(edge.node_id, b);

        // Visible through a fresh evaluation, which reloads the plan.
        let result = engine.evaluate_accessibility(plan.goal.id, b).unwrap();
        assert!(!result.can_interact);
        assert_eq!(result.blocking_node_ids, vec![a]);
    }

    #[test]
    fn add_dependency_rejects_self_loop() {
        let (engine, plan, _dir) = engine_with_plan(&["a"]);
        let a = plan.nodes[0].id;
        let result = engine.add_dependency(plan.goal.id, a, a, DependencyKind::FinishToStart);
        assert!(matches!(
            result,
            Err(EngineError::Graph(GraphError::SelfDependency(_)))
        ));
    }

    #[test]
    fn add_dependency_rejects_foreign_node() {
        let (engine, plan, _dir) = engine_with_plan(&["a"]);
        let a = plan.nodes[0].id;
        let foreign = Uuid::new_v4();
        let result = engine.add_dependency(plan.goal.id, a, foreign, DependencyKind::FinishToStart);
        assert!(matches!(result, Err(EngineError::NodeNotFound(id)) if id == foreign));
    }

    #[test]
    fn add_dependency_rejects_cycle_and_persists_nothing() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b", "c"]);
        let goal_id = plan.goal.id;
        let a = plan.nodes[0].id;
        let b = plan.nodes[1].id;
        let c = plan.nodes[2].id;

        // a depends on b, b depends on c.
        engine
            .add_dependency(goal_id, a, b, DependencyKind::FinishToStart)
            .unwrap();
        engine
            .add_dependency(goal_id, b, c, DependencyKind::FinishToStart)
            .unwrap();

        let result = engine.add_dependency(goal_id, c, a, DependencyKind::FinishToStart);
        assert!(matches!(
            result,
            Err(EngineError::Graph(GraphError::CycleDetected { .. }))
        ));

        // The rejected edge is gone after reload: removing it is NotFound.
        let result = engine.remove_dependency(goal_id, c, a);
        assert!(matches!(
            result,
            Err(EngineError::Graph(GraphError::EdgeNotFound { .. }))
        ));
    }

    #[test]
    fn remove_dependency_then_reverse_edge_is_allowed() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b"]);
        let goal_id = plan.goal.id;
        let a = plan.nodes[0].id;
        let b = plan.nodes[1].id;

        engine
            .add_dependency(goal_id, b, a, DependencyKind::FinishToStart)
            .unwrap();
        engine.remove_dependency(goal_id, b, a).unwrap();
        engine
            .add_dependency(goal_id, a, b, DependencyKind::FinishToStart)
            .unwrap();
    }

    #[test]
    fn complete_node_cascades_and_persists() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b"]);
        let goal_id = plan.goal.id;
        let a = plan.nodes[0].id;
        let b = plan.nodes[1].id;
        engine
            .add_dependency(goal_id, b, a, DependencyKind::FinishToStart)
            .unwrap();

        let outcome = engine.complete_node(goal_id, a).unwrap();
        assert_eq!(outcome.node.status, NodeStatus::Completed);
        assert_eq!(outcome.activated_node_ids, vec![b]);

        // Reload through the public surface: b is now interactable.
        assert!(engine.evaluate_accessibility(goal_id, b).unwrap().can_interact);
    }

    #[test]
    fn complete_node_twice_is_rejected() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b"]);
        let goal_id = plan.goal.id;
        let a = plan.nodes[0].id;

        engine.complete_node(goal_id, a).unwrap();
        let result = engine.complete_node(goal_id, a);
        assert!(matches!(
            result,
            Err(EngineError::Plan(PlanError::NodeNotActive { .. }))
        ));
    }

    #[test]
    fn unknown_goal_is_plan_not_found() {
        let (engine, _plan, _dir) = engine_with_plan(&["a"]);
        let result = engine.complete_node(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(EngineError::PlanNotFound(_))));
    }

    #[test]
    fn concurrent_completions_on_one_goal_serialize() {
        let (engine, plan, _dir) = engine_with_plan(&["a", "b"]);
        let goal_id = plan.goal.id;
        let a = plan.nodes[0].id;
        let b = plan.nodes[1].id;
        // Make both nodes independently completable.
        {
            let mut stored = engine.store.load(goal_id).unwrap().unwrap();
            stored.node_mut(b).unwrap().activate().unwrap();
            engine.store.save(&stored).unwrap();
        }

        let engine = Arc::new(engine);
        let handles: Vec<_> = [a, b]
            .into_iter()
            .map(|node_id| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || engine.complete_node(goal_id, node_id).unwrap())
            })
            .collect();
        let outcomes: Vec<CascadeOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Both completions took effect; exactly one of them observed the
        // goal as fully completed.
        let final_plan = engine.store.load(goal_id).unwrap().unwrap();
        assert!(final_plan.all_nodes_completed());
        assert_eq!(
            outcomes.iter().filter(|o| o.goal_completed).count(),
            1
        );
    }
}
