use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cascade_core::{
    BernoulliSource, CascadeEngine, CascadeError, CascadeGraph, CascadeState, NodeId,
};

/// Aggregate statistics over independent cascade replications.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfluenceReport {
    pub replications: usize,
    /// Seed set used for every replication, sorted and deduplicated.
    pub seeds: Vec<NodeId>,
    /// Mean number of nodes activated **beyond the seed set**. The seeds
    /// themselves are excluded by contract: the reported value is the
    /// additional nodes influenced.
    pub mean_spread: f64,
    /// Per-replication spread (activated count minus seed count), in
    /// replication order.
    pub spreads: Vec<usize>,
    /// For each node, the fraction of replications in which it ended up
    /// active. Seed nodes sit at 1.0 by construction.
    pub activation_frequency: Vec<f64>,
}

impl InfluenceReport {
    /// Nodes ranked by activation frequency descending, ties broken by
    /// lowest index. Seeds are skipped.
    pub fn most_influenced(&self, k: usize) -> Vec<NodeId> {
        let mut ranked: Vec<NodeId> = (0..self.activation_frequency.len())
            .filter(|v| self.seeds.binary_search(v).is_err())
            .collect();
        ranked.sort_by(|&a, &b| {
            self.activation_frequency[b]
                .partial_cmp(&self.activation_frequency[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });
        ranked.truncate(k);
        ranked
    }
}

/// Estimates the influence spread of a seed set by repeated simulation.
///
/// Replications are independent: each gets its own [`CascadeState`] and an
/// RNG stream derived from `(global_seed, replication_id)`, so the result
/// is reproducible and identical whether replications run sequentially or
/// on the rayon pool (the reduction is commutative and applied in
/// replication order either way).
#[derive(Clone, Copy, Debug, Default)]
pub struct InfluenceEstimator;

impl InfluenceEstimator {
    /// Run `replications` cascades from `seeds` and aggregate.
    ///
    /// Fails with `InvalidReplicationCount` on zero replications and with
    /// `InvalidSeed` on an out-of-range seed.
    pub fn estimate(
        &self,
        graph: &CascadeGraph,
        seeds: &[NodeId],
        replications: usize,
        global_seed: u64,
    ) -> Result<InfluenceReport, CascadeError> {
        self.run(graph, seeds, replications, global_seed, true)
    }

    /// Sequential twin of [`estimate`](Self::estimate); same result.
    pub fn estimate_sequential(
        &self,
        graph: &CascadeGraph,
        seeds: &[NodeId],
        replications: usize,
        global_seed: u64,
    ) -> Result<InfluenceReport, CascadeError> {
        self.run(graph, seeds, replications, global_seed, false)
    }

    fn run(
        &self,
        graph: &CascadeGraph,
        seeds: &[NodeId],
        replications: usize,
        global_seed: u64,
        parallel: bool,
    ) -> Result<InfluenceReport, CascadeError> {
        if replications == 0 {
            return Err(CascadeError::InvalidReplicationCount(replications));
        }

        // Validate and normalize the seed set once, up front.
        let mut probe = CascadeState::new(graph);
        probe.reset(seeds)?;
        let seeds = probe.seeds().to_vec();

        let simulate = |rep: usize| -> Result<Vec<NodeId>, CascadeError> {
            let mut state = CascadeState::new(graph);
            state.reset(&seeds)?;
            let mut rng = BernoulliSource::for_replication(global_seed, rep as u64);
            CascadeEngine.run(graph, &mut state, &mut rng, None)?;
            Ok(state.activated_nodes())
        };

        let outcomes: Vec<Vec<NodeId>> = if parallel {
            (0..replications)
                .into_par_iter()
                .map(simulate)
                .collect::<Result<_, _>>()?
        } else {
            (0..replications)
                .map(simulate)
                .collect::<Result<_, _>>()?
        };

        let mut activation_counts = vec![0usize; graph.node_count()];
        let mut spreads = Vec::with_capacity(replications);
        for activated in &outcomes {
            for &node in activated {
                activation_counts[node] += 1;
            }
            spreads.push(activated.len() - seeds.len());
        }

        let mean_spread = spreads.iter().sum::<usize>() as f64 / replications as f64;
        let activation_frequency = activation_counts
            .into_iter()
            .map(|c| c as f64 / replications as f64)
            .collect();

        debug!(
            replications,
            seed_count = seeds.len(),
            mean_spread,
            "influence estimate complete"
        );

        Ok(InfluenceReport {
            replications,
            seeds,
            mean_spread,
            spreads,
            activation_frequency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_single_edge_spread() {
        // 0 -> 1 with p = 1.0: every replication activates exactly node 1
        // beyond the seed.
        let g = CascadeGraph::uniform(2, &[(0, 1)], 1.0).unwrap();
        let report = InfluenceEstimator
            .estimate(&g, &[0], 100, 42)
            .unwrap();

        assert_eq!(report.replications, 100);
        assert_eq!(report.mean_spread, 1.0);
        assert_eq!(report.activation_frequency[0], 1.0);
        assert_eq!(report.activation_frequency[1], 1.0);
        assert!(report.spreads.iter().all(|&s| s == 1));
    }

    #[test]
    fn impossible_edge_spreads_nothing() {
        let g = CascadeGraph::uniform(2, &[(0, 1)], 0.0).unwrap();
        let report = InfluenceEstimator.estimate(&g, &[0], 50, 42).unwrap();
        assert_eq!(report.mean_spread, 0.0);
        assert_eq!(report.activation_frequency[1], 0.0);
    }

    #[test]
    fn zero_replications_rejected() {
        let g = CascadeGraph::uniform(2, &[(0, 1)], 1.0).unwrap();
        assert_eq!(
            InfluenceEstimator.estimate(&g, &[0], 0, 42).unwrap_err(),
            CascadeError::InvalidReplicationCount(0)
        );
    }

    #[test]
    fn invalid_seed_rejected_before_any_run() {
        let g = CascadeGraph::uniform(2, &[(0, 1)], 1.0).unwrap();
        assert_eq!(
            InfluenceEstimator.estimate(&g, &[5], 10, 42).unwrap_err(),
            CascadeError::InvalidSeed { node: 5, node_count: 2 }
        );
    }

    #[test]
    fn parallel_and_sequential_agree_exactly() {
        let pairs: Vec<(usize, usize)> = (0..20)
            .flat_map(|u| [(u, (u + 1) % 20), (u, (u + 3) % 20)])
            .collect();
        let g = CascadeGraph::uniform(20, &pairs, 0.4).unwrap();

        let par = InfluenceEstimator.estimate(&g, &[0, 5], 500, 7).unwrap();
        let seq = InfluenceEstimator
            .estimate_sequential(&g, &[0, 5], 500, 7)
            .unwrap();

        assert_eq!(par.spreads, seq.spreads);
        assert_eq!(par.activation_frequency, seq.activation_frequency);
        assert_eq!(par.mean_spread, seq.mean_spread);
    }

    #[test]
    fn estimates_are_reproducible_per_seed() {
        let g = CascadeGraph::uniform(10, &[(0, 1), (1, 2), (2, 3), (0, 4)], 0.5).unwrap();
        let a = InfluenceEstimator.estimate(&g, &[0], 200, 11).unwrap();
        let b = InfluenceEstimator.estimate(&g, &[0], 200, 11).unwrap();
        assert_eq!(a.spreads, b.spreads);

        let c = InfluenceEstimator.estimate(&g, &[0], 200, 12).unwrap();
        assert_ne!(a.spreads, c.spreads);
    }

    #[test]
    fn duplicate_seeds_are_collapsed() {
        let g = CascadeGraph::uniform(3, &[(0, 1)], 1.0).unwrap();
        let report = InfluenceEstimator.estimate(&g, &[0, 0, 0], 10, 1).unwrap();
        assert_eq!(report.seeds, vec![0]);
        assert_eq!(report.mean_spread, 1.0);
    }

    #[test]
    fn frequency_tracks_edge_probability() {
        let g = CascadeGraph::uniform(2, &[(0, 1)], 0.3).unwrap();
        let report = InfluenceEstimator.estimate(&g, &[0], 20_000, 99).unwrap();
        assert!(
            (report.activation_frequency[1] - 0.3).abs() < 0.02,
            "frequency {} too far from 0.3",
            report.activation_frequency[1]
        );
    }

    #[test]
    fn most_influenced_ranks_by_frequency() {
        // 0 -> 1 certain, 0 -> 2 impossible.
        let g = CascadeGraph::build(
            3,
            vec![
                cascade_core::Edge::new(0, 1, 1.0),
                cascade_core::Edge::new(0, 2, 0.0),
            ],
        )
        .unwrap();
        let report = InfluenceEstimator.estimate(&g, &[0], 20, 1).unwrap();
        assert_eq!(report.most_influenced(2), vec![1, 2]);
        assert_eq!(report.most_influenced(1), vec![1]);
    }
}
