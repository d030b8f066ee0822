use cascade_core::{BernoulliSource, CascadeEngine, CascadeGraph, CascadeState, Edge};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_graph(seed: u64, n: usize, edge_prob: f64) -> CascadeGraph {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in 0..n {
            if u != v && rng.gen::<f64>() < edge_prob {
                edges.push(Edge::new(u, v, rng.gen::<f64>()));
            }
        }
    }
    CascadeGraph::build(n, edges).unwrap()
}

/// Reference quiescence check, written as the naive scan the definition
/// gives, to cross-check `is_done` after every step.
fn quiescent_by_scan(graph: &CascadeGraph, state: &CascadeState) -> bool {
    for (id, edge) in graph.edges().iter().enumerate() {
        if state.is_active(edge.source) && !state.is_active(edge.target) && !state.is_tried(id) {
            return false;
        }
    }
    true
}

#[test]
fn activation_is_monotone_and_edges_single_use() {
    let graph = random_graph(21, 50, 0.1);
    let engine = CascadeEngine;

    for rng_seed in 0..10u64 {
        let mut state = CascadeState::new(&graph);
        state.reset(&[0, 1]).unwrap();
        let mut rng = BernoulliSource::new(rng_seed);

        let mut active_before: Vec<bool> =
            (0..graph.node_count()).map(|v| state.is_active(v)).collect();
        let mut tried_before: Vec<bool> =
            (0..graph.edge_count()).map(|e| state.is_tried(e)).collect();

        while !engine.is_done(&graph, &state) {
            engine.step(&graph, &mut state, &mut rng).unwrap();

            for v in 0..graph.node_count() {
                assert!(
                    !active_before[v] || state.is_active(v),
                    "node {v} reverted to inactive"
                );
            }
            for e in 0..graph.edge_count() {
                assert!(
                    !tried_before[e] || state.is_tried(e),
                    "edge {e} reverted to untried"
                );
            }

            active_before = (0..graph.node_count()).map(|v| state.is_active(v)).collect();
            tried_before = (0..graph.edge_count()).map(|e| state.is_tried(e)).collect();
        }
    }
}

#[test]
fn is_done_matches_naive_scan_after_every_step() {
    let graph = random_graph(33, 40, 0.12);
    let engine = CascadeEngine;

    for rng_seed in 0..10u64 {
        let mut state = CascadeState::new(&graph);
        state.reset(&[2]).unwrap();
        let mut rng = BernoulliSource::new(rng_seed);

        assert_eq!(engine.is_done(&graph, &state), quiescent_by_scan(&graph, &state));
        while !engine.is_done(&graph, &state) {
            engine.step(&graph, &mut state, &mut rng).unwrap();
            assert_eq!(
                engine.is_done(&graph, &state),
                quiescent_by_scan(&graph, &state)
            );
        }
    }
}

#[test]
fn run_terminates_within_edge_count_steps() {
    for graph_seed in 0..5u64 {
        let graph = random_graph(graph_seed, 40, 0.15);
        let engine = CascadeEngine;

        for rng_seed in 0..5u64 {
            let mut state = CascadeState::new(&graph);
            state.reset(&[0]).unwrap();
            let mut rng = BernoulliSource::new(rng_seed);

            // The formal bound doubles as a max_steps that can never trip.
            let steps = engine
                .run(&graph, &mut state, &mut rng, Some(graph.edge_count()))
                .unwrap();
            assert!(steps <= graph.edge_count());
        }
    }
}

#[test]
fn only_eligible_edges_are_ever_tried() {
    // An edge whose source never activates must stay untried forever.
    let graph = random_graph(55, 30, 0.1);
    let engine = CascadeEngine;

    let mut state = CascadeState::new(&graph);
    state.reset(&[0]).unwrap();
    let mut rng = BernoulliSource::new(9);
    engine.run(&graph, &mut state, &mut rng, None).unwrap();

    for (id, edge) in graph.edges().iter().enumerate() {
        if state.is_tried(id) {
            assert!(
                state.is_active(edge.source),
                "edge {id} was tried although its source never activated"
            );
        }
    }
}
