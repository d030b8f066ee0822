use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cascade_core::{CascadeError, CascadeGraph, NodeId};

use crate::estimator::InfluenceEstimator;

/// Mixing constant for per-candidate estimator seeds, distinct from the
/// per-replication constant so candidate streams never collide with
/// replication streams.
const CANDIDATE_SEED_MIX: u64 = 0xd1b54a32d192ed03;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// `k` distinct nodes uniformly at random; no influence computation.
    Random,
    /// Every node singly seeded and estimated; top `k` by mean spread,
    /// ties broken by lowest node index.
    GreedyByFrequency,
}

/// Chooses candidate seed sets to hand to the estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeedSelector;

impl SeedSelector {
    /// Select `k` seed nodes by `strategy`.
    ///
    /// `k` larger than the node count is rejected as `InvalidSeed`; the
    /// greedy strategy additionally requires a positive replication count.
    pub fn select_top_k(
        &self,
        graph: &CascadeGraph,
        k: usize,
        replications: usize,
        strategy: SelectionStrategy,
        global_seed: u64,
    ) -> Result<Vec<NodeId>, CascadeError> {
        if k > graph.node_count() {
            return Err(CascadeError::InvalidSeed {
                node: k,
                node_count: graph.node_count(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        match strategy {
            SelectionStrategy::Random => {
                let mut nodes: Vec<NodeId> = (0..graph.node_count()).collect();
                let mut rng = ChaCha20Rng::seed_from_u64(global_seed);
                nodes.shuffle(&mut rng);
                nodes.truncate(k);
                Ok(nodes)
            }

            SelectionStrategy::GreedyByFrequency => {
                if replications == 0 {
                    return Err(CascadeError::InvalidReplicationCount(replications));
                }

                let estimator = InfluenceEstimator;
                let mut ranked: Vec<(NodeId, f64)> = Vec::with_capacity(graph.node_count());
                for node in 0..graph.node_count() {
                    // Independent stream per candidate
                    let candidate_seed =
                        global_seed ^ (node as u64).wrapping_mul(CANDIDATE_SEED_MIX);
                    let report =
                        estimator.estimate(graph, &[node], replications, candidate_seed)?;
                    ranked.push((node, report.mean_spread));
                }

                ranked.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.0.cmp(&b.0))
                });
                debug!(k, candidates = ranked.len(), "greedy selection ranked");
                Ok(ranked.into_iter().take(k).map(|(node, _)| node).collect())
            }
        }
    }
}
