pub mod engine;
pub mod error;
pub mod graph;
pub mod rng;
pub mod state;

// Core index types
pub type NodeId = usize;
pub type EdgeId = usize;

pub use engine::CascadeEngine;
pub use error::CascadeError;
pub use graph::{CascadeGraph, Edge};
pub use rng::BernoulliSource;
pub use state::CascadeState;
