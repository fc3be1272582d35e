// src/bin/cahoots.rs
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cahoots_core::cli::{self, Cli, CliqueArgs, Commands};
use cahoots_core::config::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_local()?,
    };
    dispatch(&cli, &config)
}

fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Compare { metric, proc } => cli::handle_compare(config, *metric, *proc),
        Commands::Specials { metric, proc } => cli::handle_specials(config, *metric, *proc),
        Commands::Cliques {
            metric,
            proc,
            threshold,
            no_specials,
            format,
            out,
        } => cli::handle_cliques(
            config,
            &CliqueArgs {
                metric: *metric,
                proc: *proc,
                threshold: *threshold,
                no_specials: *no_specials,
                format: format.clone(),
                out: out.clone(),
            },
        ),
        Commands::Buddies {
            metric,
            proc,
            threshold,
        } => cli::handle_buddies(config, *metric, *proc, *threshold),
    }
}
