use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::info;

use cascade_core::{BernoulliSource, CascadeEngine, CascadeError, CascadeGraph, CascadeState};
use cascade_influence::{InfluenceEstimator, SeedSelector, SelectionStrategy};

use crate::{GraphFile, RunManifest, SelectionReport};

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Independent-cascade diffusion simulator")]
#[command(long_about = "Simulates independent-cascade diffusion over directed graphs \
and estimates seed-set influence via Monte-Carlo replication")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single cascade to quiescence and print each round
    Run {
        #[command(flatten)]
        graph: GraphSource,

        /// Seed nodes, comma separated
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<usize>,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fail if quiescence is not reached within this many steps
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Estimate a seed set's influence spread over many replications
    Estimate {
        #[command(flatten)]
        graph: GraphSource,

        /// Seed nodes, comma separated
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<usize>,

        /// Number of Monte-Carlo replications
        #[arg(long, default_value = "1000")]
        replications: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output JSON report
        #[arg(long)]
        out: PathBuf,
    },

    /// Select the top-k seed nodes by strategy
    Select {
        #[command(flatten)]
        graph: GraphSource,

        /// Number of seed nodes to select
        #[arg(long)]
        k: usize,

        /// Replications per candidate (greedy strategy)
        #[arg(long, default_value = "200")]
        replications: usize,

        /// Selection strategy
        #[arg(long, value_enum, default_value = "greedy-by-frequency")]
        strategy: StrategyType,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output JSON report
        #[arg(long)]
        out: PathBuf,
    },
}

/// Where the graph comes from: a JSON file or a seeded generator.
#[derive(Args)]
pub struct GraphSource {
    /// Graph JSON file ({node_count, edges})
    #[arg(long, conflicts_with = "gen")]
    pub graph: Option<PathBuf>,

    /// Generator model
    #[arg(long, value_enum)]
    pub gen: Option<GenModel>,

    /// Generator parameters (JSON)
    #[arg(long)]
    pub params: Option<String>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum GenModel {
    #[value(name = "ring-lattice")]
    RingLattice,
    #[value(name = "small-world")]
    SmallWorld,
    #[value(name = "erdos-renyi")]
    ErdosRenyi,
    #[value(name = "caveman")]
    Caveman,
    #[value(name = "preferential-attachment")]
    PreferentialAttachment,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    #[value(name = "random")]
    Random,
    #[value(name = "greedy-by-frequency")]
    GreedyByFrequency,
}

impl From<StrategyType> for SelectionStrategy {
    fn from(strategy: StrategyType) -> Self {
        match strategy {
            StrategyType::Random => SelectionStrategy::Random,
            StrategyType::GreedyByFrequency => SelectionStrategy::GreedyByFrequency,
        }
    }
}

impl GraphSource {
    /// Build the graph and a human-readable description of its origin.
    pub fn resolve(&self, seed: u64) -> anyhow::Result<(CascadeGraph, String)> {
        if let Some(path) = &self.graph {
            let graph = GraphFile::load(path)?;
            return Ok((graph, path.display().to_string()));
        }

        let Some(model) = &self.gen else {
            anyhow::bail!("either --graph or --gen is required");
        };

        let params = if let Some(params_str) = &self.params {
            serde_json::from_str(params_str)?
        } else {
            json!({})
        };

        let n = params.get("n").and_then(|v| v.as_u64()).unwrap_or(100) as usize;
        let p = params.get("p").and_then(|v| v.as_f64()).unwrap_or(0.2);

        let graph = match model {
            GenModel::RingLattice => {
                let k = params.get("k").and_then(|v| v.as_u64()).unwrap_or(4) as usize;
                cascade_models::ring_lattice(n, k, p)?
            }
            GenModel::SmallWorld => {
                let k = params.get("k").and_then(|v| v.as_u64()).unwrap_or(4) as usize;
                let rewire = params.get("rewire").and_then(|v| v.as_f64()).unwrap_or(0.1);
                cascade_models::small_world(n, k, rewire, p, seed)?
            }
            GenModel::ErdosRenyi => {
                let edge_prob = params
                    .get("edge_prob")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.05);
                cascade_models::erdos_renyi(n, edge_prob, p, seed)?
            }
            GenModel::Caveman => {
                let m = params.get("m").and_then(|v| v.as_u64()).unwrap_or(10) as usize;
                let community = params.get("community").and_then(|v| v.as_u64()).unwrap_or(10)
                    as usize;
                let rewire = params.get("rewire").and_then(|v| v.as_f64()).unwrap_or(0.1);
                cascade_models::caveman(m, community, rewire, p, seed)?
            }
            GenModel::PreferentialAttachment => {
                let m = params.get("m").and_then(|v| v.as_u64()).unwrap_or(2) as usize;
                cascade_models::preferential_attachment(n, m, p, seed)?
            }
        };

        let description = format!(
            "{model:?} (n={}, p={p}, seed={seed})",
            graph.node_count()
        );
        Ok((graph, description))
    }
}

pub async fn run_run_command(
    graph: GraphSource,
    seeds: Vec<usize>,
    seed: u64,
    max_steps: Option<usize>,
) -> anyhow::Result<()> {
    let (graph, source) = graph.resolve(seed)?;

    println!("Cascade Run");
    println!("===========");
    println!("Graph: {source}");
    println!("Nodes: {}, Edges: {}", graph.node_count(), graph.edge_count());
    println!("Seeds: {seeds:?}");
    println!("Seed: {seed}");

    let engine = CascadeEngine;
    let mut state = CascadeState::new(&graph);
    state.reset(&seeds)?;
    let mut rng = BernoulliSource::new(seed);

    let mut steps = 0;
    while !engine.is_done(&graph, &state) {
        if let Some(limit) = max_steps {
            if steps >= limit {
                return Err(CascadeError::StepLimitExceeded { limit }.into());
            }
        }
        let fired = engine.step(&graph, &mut state, &mut rng)?;
        steps += 1;
        println!("Step {steps}: activated {} node(s): {fired:?}", fired.len());
    }

    info!(
        steps,
        activated = state.activated_count(),
        "run command complete"
    );
    println!();
    println!(
        "Quiescent after {steps} step(s); {} of {} nodes active",
        state.activated_count(),
        graph.node_count()
    );
    println!("Active nodes: {:?}", state.activated_nodes());
    Ok(())
}

pub async fn run_estimate_command(
    graph: GraphSource,
    seeds: Vec<usize>,
    replications: usize,
    seed: u64,
    out: PathBuf,
) -> anyhow::Result<()> {
    let (graph, source) = graph.resolve(seed)?;

    println!("Cascade Influence Estimation");
    println!("============================");
    println!("Graph: {source}");
    println!("Nodes: {}, Edges: {}", graph.node_count(), graph.edge_count());
    println!("Seeds: {seeds:?}");
    println!("Replications: {replications}");
    println!("Seed: {seed}");

    let report = InfluenceEstimator.estimate(&graph, &seeds, replications, seed)?;
    info!(
        replications,
        mean_spread = report.mean_spread,
        "estimate command complete"
    );

    let manifest = RunManifest::new("estimate", seed, &source, &graph)
        .with_seeds(&report.seeds)
        .with_replications(replications);
    let manifest_path = out.with_extension("manifest.json");

    std::fs::write(&out, serde_json::to_string_pretty(&report)?)?;
    manifest.save_to_file(&manifest_path)?;

    println!();
    println!("Mean spread (beyond seeds): {:.4}", report.mean_spread);
    println!("Most influenced nodes: {:?}", report.most_influenced(10));
    println!("Wrote report to {}", out.display());
    println!("Wrote manifest to {}", manifest_path.display());
    Ok(())
}

pub async fn run_select_command(
    graph: GraphSource,
    k: usize,
    replications: usize,
    strategy: StrategyType,
    seed: u64,
    out: PathBuf,
) -> anyhow::Result<()> {
    let (graph, source) = graph.resolve(seed)?;
    let strategy: SelectionStrategy = strategy.into();

    println!("Cascade Seed Selection");
    println!("======================");
    println!("Graph: {source}");
    println!("Nodes: {}, Edges: {}", graph.node_count(), graph.edge_count());
    println!("k: {k}, Strategy: {strategy:?}");
    println!("Replications: {replications}");
    println!("Seed: {seed}");

    let selected = SeedSelector.select_top_k(&graph, k, replications, strategy, seed)?;
    info!(k, ?strategy, ?selected, "select command complete");

    let report = SelectionReport {
        k,
        strategy: format!("{strategy:?}"),
        replications,
        selected: selected.clone(),
    };
    let manifest = RunManifest::new("select", seed, &source, &graph)
        .with_replications(replications)
        .with_strategy(strategy);
    let manifest_path = out.with_extension("manifest.json");

    std::fs::write(&out, serde_json::to_string_pretty(&report)?)?;
    manifest.save_to_file(&manifest_path)?;

    println!();
    println!("Selected seeds: {selected:?}");
    println!("Wrote report to {}", out.display());
    println!("Wrote manifest to {}", manifest_path.display());
    Ok(())
}
