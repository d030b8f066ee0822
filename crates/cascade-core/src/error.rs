use std::fmt;

/// Validation failures surfaced to the caller at construction or call time.
/// None of these are retried or clamped internally.
#[derive(Debug, PartialEq)]
pub enum CascadeError {
    InvalidEdge {
        source: usize,
        target: usize,
        node_count: usize,
    },

    DuplicateEdge { source: usize, target: usize },

    InvalidProbability(f64),

    InvalidSeed { node: usize, node_count: usize },

    InvalidReplicationCount(usize),

    StepLimitExceeded { limit: usize },
}

impl fmt::Display for CascadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeError::InvalidEdge {
                source,
                target,
                node_count,
            } => write!(
                f,
                "edge ({source}, {target}) references a node outside [0, {node_count})"
            ),
            CascadeError::DuplicateEdge { source, target } => {
                write!(f, "duplicate edge ({source}, {target})")
            }
            CascadeError::InvalidProbability(p) => {
                write!(f, "activation probability must lie in [0, 1], got {p}")
            }
            CascadeError::InvalidSeed { node, node_count } => {
                write!(f, "seed node {node} out of range [0, {node_count})")
            }
            CascadeError::InvalidReplicationCount(n) => {
                write!(f, "replication count must be positive, got {n}")
            }
            CascadeError::StepLimitExceeded { limit } => {
                write!(f, "cascade did not reach quiescence within {limit} steps")
            }
        }
    }
}

impl std::error::Error for CascadeError {}
