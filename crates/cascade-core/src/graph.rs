use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CascadeError;
use crate::{EdgeId, NodeId};

/// Directed edge with its activation probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub probability: f64,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, probability: f64) -> Self {
        Self {
            source,
            target,
            probability,
        }
    }
}

/// Immutable-topology directed graph consumed by the cascade engine.
///
/// Edge ids are dense indices assigned in insertion order; `edges()`
/// iterates in exactly that order, which is the order the engine draws
/// coin flips in. Topology and probabilities never change after `build`.
#[derive(Clone, Debug)]
pub struct CascadeGraph {
    node_count: usize,
    edges: Vec<Edge>,
    out: Vec<Vec<EdgeId>>,
    pair_index: HashMap<(NodeId, NodeId), EdgeId>,
}

impl CascadeGraph {
    /// Build a graph from an ordered edge list.
    ///
    /// Fails with `InvalidEdge` on an out-of-range endpoint,
    /// `DuplicateEdge` on a repeated ordered pair, and
    /// `InvalidProbability` on a probability outside `[0, 1]`.
    pub fn build(node_count: usize, edges: Vec<Edge>) -> Result<Self, CascadeError> {
        let mut out = vec![Vec::new(); node_count];
        let mut pair_index = HashMap::with_capacity(edges.len());

        for (id, edge) in edges.iter().enumerate() {
            if edge.source >= node_count || edge.target >= node_count {
                return Err(CascadeError::InvalidEdge {
                    source: edge.source,
                    target: edge.target,
                    node_count,
                });
            }
            if !(0.0..=1.0).contains(&edge.probability) {
                return Err(CascadeError::InvalidProbability(edge.probability));
            }
            if pair_index.insert((edge.source, edge.target), id).is_some() {
                return Err(CascadeError::DuplicateEdge {
                    source: edge.source,
                    target: edge.target,
                });
            }
            out[edge.source].push(id);
        }

        Ok(Self {
            node_count,
            edges,
            out,
            pair_index,
        })
    }

    /// Build with one uniform activation probability on every edge.
    pub fn uniform(
        node_count: usize,
        pairs: &[(NodeId, NodeId)],
        probability: f64,
    ) -> Result<Self, CascadeError> {
        let edges = pairs
            .iter()
            .map(|&(u, v)| Edge::new(u, v, probability))
            .collect();
        Self::build(node_count, edges)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Edge ids leaving `u`, in the same relative order as `edges()`.
    pub fn out_edges(&self, u: NodeId) -> &[EdgeId] {
        self.out.get(u).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Dense id of the edge `(u, v)`, if present.
    pub fn edge_id(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.pair_index.get(&(u, v)).copied()
    }
}
