use tracing::debug;

use crate::error::CascadeError;
use crate::graph::CascadeGraph;
use crate::rng::BernoulliSource;
use crate::state::CascadeState;
use crate::NodeId;

/// Drives the synchronous update loop of the independent-cascade model.
///
/// Stateless: build once, drive any number of `(graph, state)` pairs.
/// A run is **Done** once no edge remains whose source is active, whose
/// target is inactive, and which has not been tried; `is_done` re-derives
/// that from state on every call rather than caching a flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct CascadeEngine;

impl CascadeEngine {
    /// Quiescence check: true iff no further activation is possible.
    pub fn is_done(&self, graph: &CascadeGraph, state: &CascadeState) -> bool {
        !graph.edges().iter().enumerate().any(|(id, edge)| {
            state.is_active(edge.source) && !state.is_active(edge.target) && !state.is_tried(id)
        })
    }

    /// One synchronous round. Returns the newly activated nodes, ascending.
    ///
    /// Every eligible edge (active source, inactive target, untried) is
    /// evaluated in graph edge order and marked tried the moment it is
    /// evaluated, win or lose. Firing decisions all use the pre-round
    /// active set: activations are buffered during the scan and committed
    /// only after it, so a node activated this round cannot enable further
    /// edges until the next round.
    ///
    /// No-op returning an empty list when the run is already done.
    pub fn step(
        &self,
        graph: &CascadeGraph,
        state: &mut CascadeState,
        rng: &mut BernoulliSource,
    ) -> Result<Vec<NodeId>, CascadeError> {
        let mut fired: Vec<NodeId> = Vec::new();

        for (id, edge) in graph.edges().iter().enumerate() {
            if state.is_tried(id) {
                continue;
            }
            if !state.is_active(edge.source) {
                continue;
            }
            if state.is_active(edge.target) {
                continue;
            }

            // Edge is consumed on first evaluation regardless of outcome.
            state.mark_tried(id);
            if rng.fire(edge.probability)? {
                fired.push(edge.target);
            }
        }

        fired.sort_unstable();
        fired.dedup();
        for &node in &fired {
            state.activate(node);
        }
        Ok(fired)
    }

    /// Run to quiescence; returns the number of steps taken.
    ///
    /// With `max_steps` unset, termination is guaranteed within at most
    /// `|E|` steps: every non-terminal step tries at least one previously
    /// untried edge. With `max_steps` set, a run that is not quiescent
    /// after that many steps fails with `StepLimitExceeded`.
    pub fn run(
        &self,
        graph: &CascadeGraph,
        state: &mut CascadeState,
        rng: &mut BernoulliSource,
        max_steps: Option<usize>,
    ) -> Result<usize, CascadeError> {
        let mut steps = 0;
        while !self.is_done(graph, state) {
            if let Some(limit) = max_steps {
                if steps >= limit {
                    return Err(CascadeError::StepLimitExceeded { limit });
                }
            }
            let fired = self.step(graph, state, rng)?;
            steps += 1;
            debug!(step = steps, newly_active = fired.len(), "cascade step");
        }
        debug!(
            steps,
            activated = state.activated_count(),
            "cascade quiescent"
        );
        Ok(steps)
    }
}
