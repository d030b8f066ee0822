use cascade_io::cli::{run_estimate_command, run_run_command, run_select_command, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            graph,
            seeds,
            seed,
            max_steps,
        } => {
            run_run_command(graph, seeds, seed, max_steps).await?;
        }

        Commands::Estimate {
            graph,
            seeds,
            replications,
            seed,
            out,
        } => {
            run_estimate_command(graph, seeds, replications, seed, out).await?;
        }

        Commands::Select {
            graph,
            k,
            replications,
            strategy,
            seed,
            out,
        } => {
            run_select_command(graph, k, replications, strategy, seed, out).await?;
        }
    }

    Ok(())
}
