use crate::types::{Metric, ProcLevel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cahoots", version, about = "Collusion detection for student submissions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Path to a configuration file (defaults to ./cahoots.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the all-pairs comparison and write similarity data files
    Compare {
        /// Restrict to one metric (default: all)
        #[arg(long, value_enum)]
        metric: Option<Metric>,
        /// Restrict to one preprocessing level (default: all)
        #[arg(long, value_enum)]
        proc: Option<ProcLevel>,
    },
    /// Compare the reference solutions against every student submission
    Specials {
        #[arg(long, value_enum)]
        metric: Option<Metric>,
        #[arg(long, value_enum)]
        proc: Option<ProcLevel>,
    },
    /// Build and report similarity cliques from stored data files
    Cliques {
        #[arg(long, value_enum, default_value = "jaccard")]
        metric: Metric,
        /// Restrict to one preprocessing level (default: all)
        #[arg(long, value_enum)]
        proc: Option<ProcLevel>,
        /// Minimum similarity percentage for a pair to count as related
        #[arg(long, short, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,
        /// Leave the reference solutions out of the cliques
        #[arg(long)]
        no_specials: bool,
        /// Output format: "text" or "json"
        #[arg(long, default_value = "text")]
        format: String,
        /// Write the report here instead of the default data file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Report per-student buddy counts (clique sizes per assignment)
    Buddies {
        #[arg(long, value_enum, default_value = "jaccard")]
        metric: Metric,
        #[arg(long, value_enum, default_value = "token")]
        proc: ProcLevel,
        #[arg(long, short, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,
    },
}
