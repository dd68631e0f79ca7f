mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Insights {
            dataset,
            out,
            config,
        } => commands::insights::run(data_dir, &dataset, out.as_deref(), config.as_deref()),
        Commands::Graph { dataset, top } => commands::graph::run(data_dir, &dataset, top),
        Commands::Replay {
            dataset,
            steps,
            speed,
        } => commands::replay::run(data_dir, &dataset, steps, speed),
        Commands::Datasets => commands::datasets::run(data_dir),
        Commands::Version => commands::version::run(),
    }
}
