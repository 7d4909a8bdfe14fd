// cascade.rs — The completion cascade: complete one node, propagate
// every consequence.
//
// Runs entirely against the in-memory plan; the caller persists the
// batch and dispatches the produced effects afterwards. Order matters:
// the node's own status write comes first (later steps read it), then
// the user-visible effects are recorded, then graph propagation, then
// the goal-level completion check.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ql_plan::{Node, NodeStatus};

use crate::access;
use crate::effects::Effect;
use crate::error::EngineError;
use crate::plan::GoalPlan;

/// Points awarded per difficulty level on node completion.
const NODE_REWARD_PER_DIFFICULTY: u32 = 10;

/// Flat award for finishing a whole goal.
const GOAL_REWARD: u32 = 100;

/// Everything one completion changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// The completed node, post-transition.
    pub node: Node,

    /// Nodes the cascade activated, in activation order.
    pub activated_node_ids: Vec<Uuid>,

    /// Whether this completion finished the whole goal.
    pub goal_completed: bool,

    /// Side effects to execute after the plan batch commits.
    pub effects: Vec<Effect>,
}

/// Complete `node_id` and propagate: unlock dependents, open parallel
/// siblings, apply the linear fallback, and check goal completion.
pub fn run(plan: &mut GoalPlan, node_id: Uuid) -> Result<CascadeOutcome, EngineError> {
    // Step 1: the node's own transition. Everything after this reads
    // the new status.
    plan.node_mut(node_id)?.complete()?;
    let node = plan.node(node_id)?.clone();

    // Step 2–3: user-visible effects, recorded before propagation so
    // feedback is not delayed behind cascade computation.
    let owner_id = plan.goal.owner_id;
    let mut effects = vec![
        Effect::AwardPoints {
            user_id: owner_id,
            amount: NODE_REWARD_PER_DIFFICULTY * u32::from(node.difficulty),
            reason: "node_completed".into(),
        },
        Effect::UpdateStreak { user_id: owner_id },
        Effect::NotifyFollowers {
            goal_id: plan.goal.id,
            event_kind: "node_completed".into(),
            summary: node.title.clone(),
            payload: serde_json::json!({
                "node_id": node.id,
                "order": node.order,
            }),
        },
        Effect::UnlockCapsules { node_id },
    ];

    let mut activated = Vec::new();

    // Step 4: re-evaluate every direct dependent; activate the ones
    // this completion unblocked.
    let dependent_ids: Vec<Uuid> = plan
        .graph
        .dependents_of(node_id)
        .map(|e| e.node_id)
        .collect();
    for &dependent_id in &dependent_ids {
        if plan.node(dependent_id)?.status != NodeStatus::Locked {
            continue;
        }
        if access::evaluate(plan, dependent_id)?.can_interact {
            plan.node_mut(dependent_id)?.activate()?;
            tracing::debug!(node = %dependent_id, "dependent unlocked");
            activated.push(dependent_id);
        }
    }

    // Step 5: a completed member opens its whole parallel group —
    // activate every still-locked sibling unconditionally.
    if node.parallel_group.is_some() {
        let sibling_ids: Vec<Uuid> = plan
            .parallel_siblings(&node)
            .iter()
            .filter(|n| n.status == NodeStatus::Locked)
            .map(|n| n.id)
            .collect();
        for sibling_id in sibling_ids {
            plan.node_mut(sibling_id)?.activate()?;
            tracing::debug!(node = %sibling_id, "parallel sibling unlocked");
            activated.push(sibling_id);
        }
    }

    // Step 6: fallback for plans that were never given explicit edges —
    // with zero dependents, unlock the next node by order. Known
    // inconsistency, kept deliberately: this does not check whether the
    // next-order node has unrelated explicit dependencies of its own.
    if dependent_ids.is_empty() {
        let next_id = plan
            .nodes
            .iter()
            .find(|n| n.order == node.order + 1 && n.status == NodeStatus::Locked)
            .map(|n| n.id);
        if let Some(next_id) = next_id {
            plan.node_mut(next_id)?.activate()?;
            tracing::debug!(node = %next_id, "next node unlocked by order fallback");
            activated.push(next_id);
        }
    }

    // Step 7: goal completion.
    let goal_completed = plan.all_nodes_completed();
    if goal_completed {
        plan.goal.mark_completed();
        tracing::info!(goal = %plan.goal.id, "goal completed");
        effects.push(Effect::MarkGoalCompleted {
            goal_id: plan.goal.id,
        });
        effects.push(Effect::AwardPoints {
            user_id: owner_id,
            amount: GOAL_REWARD,
            reason: "goal_completed".into(),
        });
        effects.push(Effect::NotifyFollowers {
            goal_id: plan.goal.id,
            event_kind: "goal_completed".into(),
            summary: plan.goal.title.clone(),
            payload: serde_json::json!({ "goal_id": plan.goal.id }),
        });
    }

    Ok(CascadeOutcome {
        node,
        activated_node_ids: activated,
        goal_completed,
        effects,
    })
}
