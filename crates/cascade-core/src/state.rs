use crate::graph::CascadeGraph;
use crate::error::CascadeError;
use crate::{EdgeId, NodeId};

/// Mutable per-run state: one `active` flag per node, one `tried` flag per
/// edge, plus the seed set this run started from.
///
/// Dense arrays indexed by node/edge id keep `reset` an O(N + E) fill.
/// Only [`reset`](CascadeState::reset) and the engine mutate a state;
/// everything else is a pure query.
#[derive(Clone, Debug)]
pub struct CascadeState {
    active: Vec<bool>,
    tried: Vec<bool>,
    seeds: Vec<NodeId>,
}

impl CascadeState {
    /// Allocate state sized for `graph`, with no node active and no edge
    /// tried. Call `reset` before the first run.
    pub fn new(graph: &CascadeGraph) -> Self {
        Self {
            active: vec![false; graph.node_count()],
            tried: vec![false; graph.edge_count()],
            seeds: Vec::new(),
        }
    }

    /// Start a fresh run: every node inactive except the seeds, every edge
    /// untried. The stored seed set is sorted and deduplicated.
    pub fn reset(&mut self, seeds: &[NodeId]) -> Result<(), CascadeError> {
        let node_count = self.active.len();
        for &node in seeds {
            if node >= node_count {
                return Err(CascadeError::InvalidSeed { node, node_count });
            }
        }

        self.active.fill(false);
        self.tried.fill(false);

        let mut seeds = seeds.to_vec();
        seeds.sort_unstable();
        seeds.dedup();
        for &node in &seeds {
            self.active[node] = true;
        }
        self.seeds = seeds;
        Ok(())
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.active[node]
    }

    pub fn is_tried(&self, edge: EdgeId) -> bool {
        self.tried[edge]
    }

    pub fn activated_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Indices of all active nodes, ascending.
    pub fn activated_nodes(&self) -> Vec<NodeId> {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(i, _)| i)
            .collect()
    }

    /// Seed set of the current run, sorted ascending.
    pub fn seeds(&self) -> &[NodeId] {
        &self.seeds
    }

    pub fn is_seed(&self, node: NodeId) -> bool {
        self.seeds.binary_search(&node).is_ok()
    }

    pub fn node_count(&self) -> usize {
        self.active.len()
    }

    // Engine-only mutators. Activation is monotone: there is no way to
    // clear a single flag outside `reset`.
    pub(crate) fn mark_tried(&mut self, edge: EdgeId) {
        self.tried[edge] = true;
    }

    pub(crate) fn activate(&mut self, node: NodeId) {
        self.active[node] = true;
    }
}
