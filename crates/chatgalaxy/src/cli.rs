use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatgalaxy")]
#[command(version)]
#[command(about = "Chat log insights and keyword galaxy")]
pub struct Cli {
    /// Storage root (defaults to $CHATGALAXY_HOME or ~/.chatgalaxy)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a dataset and write its insights report
    Insights {
        dataset: String,

        /// Report path (defaults to reports/<dataset>.insights.json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Engine config JSON (defaults to <root>/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the keyword co-occurrence graph
    Graph {
        dataset: String,

        /// Heaviest links to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Step through the graph's growth over time
    Replay {
        dataset: String,

        /// Frames between the first and last keyword appearance
        #[arg(long, default_value_t = 10)]
        steps: u32,

        /// Playback speed label shown per frame
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// List stored datasets
    Datasets,

    /// Print version information
    Version,
}
