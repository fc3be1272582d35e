//! Command handlers: thin glue between parsed arguments and the library.

use crate::config::Config;
use crate::pipeline;
use crate::records;
use crate::report;
use crate::specials;
use crate::types::{Metric, ProcLevel};
use anyhow::Result;
use colored::Colorize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

fn selected_metrics(metric: Option<Metric>) -> Vec<Metric> {
    metric.map_or_else(|| Metric::all().to_vec(), |m| vec![m])
}

fn selected_procs(proc: Option<ProcLevel>) -> Vec<ProcLevel> {
    proc.map_or_else(|| ProcLevel::all().to_vec(), |p| vec![p])
}

/// Runs the all-pairs comparison grid and writes one data file per
/// (metric, level) combination.
///
/// # Errors
/// Fails on unreadable submissions or unwritable output.
pub fn handle_compare(config: &Config, metric: Option<Metric>, proc: Option<ProcLevel>) -> Result<()> {
    for metric in selected_metrics(metric) {
        for proc in selected_procs(proc) {
            let out_path = config.data_file(metric, proc);
            print!("{}: ", out_path.display().to_string().bold());
            let dir = config.latest_dir(proc);
            let scores = crate::compare::compare_directory(&dir, &config.submission_suffix, metric)?;
            records::write_score_file(&out_path, &scores)?;
            println!();
            report::announce_written(&out_path);
        }
    }
    Ok(())
}

/// Compares the reference solutions against the students, 1xN per
/// combination, and writes the special data files.
///
/// # Errors
/// Fails on unreadable submissions or unwritable output.
pub fn handle_specials(
    config: &Config,
    metric: Option<Metric>,
    proc: Option<ProcLevel>,
) -> Result<()> {
    for metric in selected_metrics(metric) {
        for proc in selected_procs(proc) {
            let out_path = config.special_file(metric, proc);
            let scores = specials::compare_one_vs_all(
                &config.special_dir(proc),
                &config.latest_dir(proc),
                &config.submission_suffix,
                metric,
            )?;
            records::write_score_file(&out_path, &scores)?;
            report::announce_written(&out_path);
        }
    }
    Ok(())
}

/// Arguments for the cliques report.
pub struct CliqueArgs {
    pub metric: Metric,
    pub proc: Option<ProcLevel>,
    pub threshold: u8,
    pub no_specials: bool,
    pub format: String,
    pub out: Option<PathBuf>,
}

/// Builds cliques for the selected levels and writes or prints the report.
///
/// # Errors
/// Fails on missing data files, parse errors, or unwritable output.
pub fn handle_cliques(config: &Config, args: &CliqueArgs) -> Result<()> {
    if args.format == "json" {
        return print_cliques_json(config, args);
    }

    let mut out = String::new();
    for proc in selected_procs(args.proc) {
        let _ = writeln!(
            out,
            "{}",
            report::format_grid_header(args.metric, proc, args.threshold)
        );
        let outcome =
            pipeline::gather_cliques(config, args.metric, proc, args.threshold, !args.no_specials)?;
        out.push_str(&report::format_cliques(&outcome.over, config));
        out.push('\n');
    }

    let out_path = args.out.clone().unwrap_or_else(|| {
        config.results_dir.join(format!(
            "clique-{}-{}{}",
            args.metric.label(),
            args.threshold,
            config.data_suffix
        ))
    });
    fs::write(&out_path, out)?;
    println!(
        "Cliques written to {}",
        out_path.display().to_string().green()
    );
    Ok(())
}

fn print_cliques_json(config: &Config, args: &CliqueArgs) -> Result<()> {
    let mut levels = serde_json::Map::new();
    for proc in selected_procs(args.proc) {
        let outcome =
            pipeline::gather_cliques(config, args.metric, proc, args.threshold, !args.no_specials)?;
        let blocks = report::format_cliques_json(&outcome.over, config)?;
        levels.insert(proc.label().to_string(), serde_json::from_str(&blocks)?);
    }
    println!("{}", serde_json::to_string_pretty(&levels)?);
    Ok(())
}

/// Prints the buddy-count ranking for one (metric, level, threshold) run.
///
/// # Errors
/// Fails on missing data files or an unlistable submission directory.
pub fn handle_buddies(config: &Config, metric: Metric, proc: ProcLevel, threshold: u8) -> Result<()> {
    let outcome = pipeline::gather_cliques(config, metric, proc, threshold, true)?;
    let attempts = report::who_did_what(config, proc)?;
    let rows = report::count_buddies(&outcome.over, &attempts, config);
    print!("{}", report::format_buddies(&rows));

    let attempted = report::did_assignment(config, proc)?;
    let mut footer = String::new();
    for assignment in &config.assignments {
        let n = attempted.get(assignment).copied().unwrap_or(0);
        let _ = write!(footer, "{assignment}={n} ");
    }
    println!("{} {}", "attempted:".cyan().bold(), footer.trim_end());
    Ok(())
}
