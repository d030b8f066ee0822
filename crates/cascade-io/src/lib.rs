use std::path::Path;

use serde::{Deserialize, Serialize};

use cascade_core::{CascadeGraph, Edge, NodeId};
use cascade_influence::SelectionStrategy;

pub mod cli;
pub use cli::*;

/// On-disk JSON form of a cascade graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphFile {
    pub node_count: usize,
    pub edges: Vec<Edge>,
}

impl GraphFile {
    pub fn from_graph(graph: &CascadeGraph) -> Self {
        Self {
            node_count: graph.node_count(),
            edges: graph.edges().to_vec(),
        }
    }

    /// Load and validate a graph description.
    pub fn load(path: &Path) -> anyhow::Result<CascadeGraph> {
        let json = std::fs::read_to_string(path)?;
        let file: GraphFile = serde_json::from_str(&json)?;
        Ok(CascadeGraph::build(file.node_count, file.edges)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run manifest for complete reproducibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub command: String,
    pub seed: u64,
    pub graph_source: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub seeds: Vec<NodeId>,
    pub replications: Option<usize>,
    pub strategy: Option<String>,
    pub commit_hash: Option<String>,
    pub rust_version: String,
}

impl RunManifest {
    pub fn new(command: &str, seed: u64, graph_source: &str, graph: &CascadeGraph) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: command.to_string(),
            seed,
            graph_source: graph_source.to_string(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            seeds: Vec::new(),
            replications: None,
            strategy: None,
            commit_hash: get_git_commit(),
            rust_version: get_rust_version(),
        }
    }

    pub fn with_seeds(mut self, seeds: &[NodeId]) -> Self {
        self.seeds = seeds.to_vec();
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = Some(replications);
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = Some(format!("{strategy:?}"));
        self
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Output of the `select` subcommand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionReport {
    pub k: usize,
    pub strategy: String,
    pub replications: usize,
    pub selected: Vec<NodeId>,
}

/// Git commit hash for reproducibility, when available.
fn get_git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
}

fn get_rust_version() -> String {
    std::process::Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::CascadeError;

    #[test]
    fn graph_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let graph = CascadeGraph::uniform(3, &[(0, 1), (1, 2)], 0.25).unwrap();
        GraphFile::from_graph(&graph).save(&path).unwrap();

        let loaded = GraphFile::load(&path).unwrap();
        assert_eq!(loaded.node_count(), 3);
        assert_eq!(loaded.edges(), graph.edges());
    }

    #[test]
    fn loading_rejects_invalid_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"node_count": 2, "edges": [{"source": 0, "target": 5, "probability": 0.5}]}"#,
        )
        .unwrap();

        let err = GraphFile::load(&path).unwrap_err();
        assert!(err.downcast_ref::<CascadeError>().is_some());
    }

    #[test]
    fn manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.manifest.json");

        let graph = CascadeGraph::uniform(4, &[(0, 1)], 0.5).unwrap();
        let manifest = RunManifest::new("estimate", 42, "graph.json", &graph)
            .with_seeds(&[0, 2])
            .with_replications(100);
        manifest.save_to_file(&path).unwrap();

        let loaded = RunManifest::load_from_file(&path).unwrap();
        assert_eq!(loaded.run_id, manifest.run_id);
        assert_eq!(loaded.seed, 42);
        assert_eq!(loaded.seeds, vec![0, 2]);
        assert_eq!(loaded.replications, Some(100));
        assert_eq!(loaded.node_count, 4);
    }
}
