pub mod estimator;
pub mod selector;

pub use estimator::{InfluenceEstimator, InfluenceReport};
pub use selector::{SeedSelector, SelectionStrategy};
