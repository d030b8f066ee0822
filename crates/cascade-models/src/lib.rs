//! Seeded graph generators producing [`CascadeGraph`]s with a uniform
//! per-edge activation probability.
//!
//! The core engine consumes any externally built graph; these builders
//! exist for tests, demos and the CLI. Every generator takes an explicit
//! seed so topologies are reproducible, and none emits self-loops or
//! duplicate ordered pairs.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use cascade_core::{CascadeError, CascadeGraph, NodeId};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Graph(#[from] CascadeError),
}

/// Directed ring lattice: each node points to its `k` clockwise successors.
pub fn ring_lattice(n: usize, k: usize, probability: f64) -> Result<CascadeGraph, ModelError> {
    if n == 0 {
        return Err(ModelError::InvalidParameter("n must be positive".into()));
    }
    if k >= n {
        return Err(ModelError::InvalidParameter(format!(
            "k = {k} must be smaller than n = {n}"
        )));
    }

    let mut pairs = Vec::with_capacity(n * k);
    for u in 0..n {
        for j in 1..=k {
            pairs.push((u, (u + j) % n));
        }
    }
    Ok(CascadeGraph::uniform(n, &pairs, probability)?)
}

/// Watts-Strogatz-style small world: a directed ring lattice whose edges
/// are rewired to a uniformly random target with probability `rewire`.
/// Rewiring keeps the source, skips self-loops and already-present pairs.
pub fn small_world(
    n: usize,
    k: usize,
    rewire: f64,
    probability: f64,
    seed: u64,
) -> Result<CascadeGraph, ModelError> {
    if !(0.0..=1.0).contains(&rewire) {
        return Err(ModelError::InvalidParameter(format!(
            "rewire probability {rewire} outside [0, 1]"
        )));
    }
    if n == 0 {
        return Err(ModelError::InvalidParameter("n must be positive".into()));
    }
    if k >= n {
        return Err(ModelError::InvalidParameter(format!(
            "k = {k} must be smaller than n = {n}"
        )));
    }

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::with_capacity(n * k);
    let mut present: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(n * k);
    for u in 0..n {
        for j in 1..=k {
            let pair = (u, (u + j) % n);
            pairs.push(pair);
            present.insert(pair);
        }
    }

    for i in 0..pairs.len() {
        if rng.gen::<f64>() >= rewire {
            continue;
        }
        let (u, old_v) = pairs[i];
        let new_v = rng.gen_range(0..n);
        if new_v == u || present.contains(&(u, new_v)) {
            continue; // keep the original edge rather than forcing a retry
        }
        present.remove(&(u, old_v));
        present.insert((u, new_v));
        pairs[i] = (u, new_v);
    }

    Ok(CascadeGraph::uniform(n, &pairs, probability)?)
}

/// G(n, p): each ordered pair `(u, v)`, `u != v`, is an edge independently
/// with probability `edge_prob`.
pub fn erdos_renyi(
    n: usize,
    edge_prob: f64,
    probability: f64,
    seed: u64,
) -> Result<CascadeGraph, ModelError> {
    if n == 0 {
        return Err(ModelError::InvalidParameter("n must be positive".into()));
    }
    if !(0.0..=1.0).contains(&edge_prob) {
        return Err(ModelError::InvalidParameter(format!(
            "edge probability {edge_prob} outside [0, 1]"
        )));
    }

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut pairs = Vec::new();
    for u in 0..n {
        for v in 0..n {
            if u != v && rng.gen::<f64>() < edge_prob {
                pairs.push((u, v));
            }
        }
    }
    Ok(CascadeGraph::uniform(n, &pairs, probability)?)
}

/// Relaxed caveman graph: `m` communities, each a clique of `n` nodes,
/// with every intra-community edge retargeted to a uniformly random node
/// anywhere in the graph with probability `rewire`. Each unordered clique
/// pair becomes one directed edge (low index -> high index before
/// rewiring); rewires that would create a self-loop or duplicate pair
/// keep the original edge instead.
pub fn caveman(
    m: usize,
    n: usize,
    rewire: f64,
    probability: f64,
    seed: u64,
) -> Result<CascadeGraph, ModelError> {
    if m == 0 {
        return Err(ModelError::InvalidParameter("m must be positive".into()));
    }
    if n < 2 {
        return Err(ModelError::InvalidParameter(
            "community size n must be at least 2".into(),
        ));
    }
    if !(0.0..=1.0).contains(&rewire) {
        return Err(ModelError::InvalidParameter(format!(
            "rewire probability {rewire} outside [0, 1]"
        )));
    }

    let total = m * n;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::with_capacity(m * n * (n - 1) / 2);
    let mut present: HashSet<(NodeId, NodeId)> = HashSet::new();

    for community in 0..m {
        let base = community * n;
        for i in 0..n {
            for j in (i + 1)..n {
                let pair = (base + i, base + j);
                pairs.push(pair);
                present.insert(pair);
            }
        }
    }

    for i in 0..pairs.len() {
        if rng.gen::<f64>() >= rewire {
            continue;
        }
        let (u, old_v) = pairs[i];
        let new_v = rng.gen_range(0..total);
        if new_v == u || present.contains(&(u, new_v)) {
            continue; // keep the original edge rather than forcing a retry
        }
        present.remove(&(u, old_v));
        present.insert((u, new_v));
        pairs[i] = (u, new_v);
    }

    Ok(CascadeGraph::uniform(total, &pairs, probability)?)
}

/// Preferential attachment: nodes arrive one at a time and receive `m`
/// incoming edges from existing nodes chosen with probability proportional
/// to out-degree + 1, so early nodes grow into high-out-degree hubs.
pub fn preferential_attachment(
    n: usize,
    m: usize,
    probability: f64,
    seed: u64,
) -> Result<CascadeGraph, ModelError> {
    if n < 2 {
        return Err(ModelError::InvalidParameter(
            "n must be at least 2".into(),
        ));
    }
    if m == 0 {
        return Err(ModelError::InvalidParameter("m must be positive".into()));
    }

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::new();
    let mut out_degree = vec![0usize; n];

    for v in 1..n {
        let sources: Vec<NodeId> = (0..v).collect();
        let picks = m.min(v);
        let chosen = sources
            .choose_multiple_weighted(&mut rng, picks, |&u| (out_degree[u] + 1) as f64)
            .map_err(|e| ModelError::InvalidParameter(e.to_string()))?;
        for &u in chosen {
            pairs.push((u, v));
            out_degree[u] += 1;
        }
    }

    Ok(CascadeGraph::uniform(n, &pairs, probability)?)
}
