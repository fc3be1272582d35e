// src/report.rs
//! Derived reports: clique listings, buddy counts, attempt census.

use crate::config::{Config, FILENAME_SEP};
use crate::error::Result;
use crate::types::{CliqueMap, Metric, ProcLevel};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

/// Clique listing for one assignment, for machine consumption.
#[derive(Debug, Serialize)]
pub struct AssignmentCliques<'a> {
    pub assignment: &'a str,
    pub cliques: &'a [Vec<String>],
}

/// One block per assignment: assignment name, then one line per clique
/// with its size and member list. Plain text, suitable for the data file.
#[must_use]
pub fn format_cliques(over: &CliqueMap, config: &Config) -> String {
    let mut out = String::new();
    for assignment in &config.assignments {
        let _ = writeln!(out, "# {assignment}");
        if let Some(cliques) = over.get(assignment) {
            for clique in cliques {
                let _ = writeln!(out, "\t{} [{}]", clique.len(), clique.join(", "));
            }
        }
        let _ = writeln!(out);
    }
    out
}

/// Header line separating the blocks of a grid report.
#[must_use]
pub fn format_grid_header(metric: Metric, proc: ProcLevel, threshold: u8) -> String {
    format!(
        "##### Metric = {}, process={}, threshold={} #####",
        metric.label(),
        proc.label(),
        threshold
    )
}

/// Clique listing as JSON, assignments in course order.
///
/// # Errors
/// Fails if serialization fails (it should not for these types).
pub fn format_cliques_json(over: &CliqueMap, config: &Config) -> Result<String> {
    let empty: Vec<Vec<String>> = Vec::new();
    let blocks: Vec<AssignmentCliques> = config
        .assignments
        .iter()
        .map(|assignment| AssignmentCliques {
            assignment,
            cliques: over.get(assignment).map_or(&empty, Vec::as_slice),
        })
        .collect();
    serde_json::to_string_pretty(&blocks)
        .map_err(|e| crate::error::CahootsError::Other(e.to_string()))
}

/// Which assignments each student attempted, from the presence of a
/// latest-submission file. Distinguishes "worked alone" (attempted, no
/// clique) from "did not attempt".
///
/// # Errors
/// Fails if the latest-submission directory cannot be listed.
pub fn who_did_what(config: &Config, proc: ProcLevel) -> Result<HashMap<String, Vec<bool>>> {
    let dir = config.latest_dir(proc);
    let mut attempts: HashMap<String, Vec<bool>> = config
        .students
        .iter()
        .map(|s| (s.clone(), vec![false; config.assignments.len()]))
        .collect();

    for (student, did) in &mut attempts {
        for (i, assignment) in config.assignments.iter().enumerate() {
            let path = dir.join(format!("{student}{FILENAME_SEP}{assignment}"));
            if path.is_file() {
                did[i] = true;
            }
        }
    }
    Ok(attempts)
}

/// How many students attempted each assignment.
///
/// # Errors
/// Fails if the latest-submission directory cannot be listed.
pub fn did_assignment(config: &Config, proc: ProcLevel) -> Result<HashMap<String, usize>> {
    let dir = config.latest_dir(proc);
    let files = crate::compare::list_submissions(&dir, &config.submission_suffix)?;
    let mut counts = HashMap::new();
    for assignment in &config.assignments {
        let n = files.iter().filter(|f| f.ends_with(assignment)).count();
        counts.insert(assignment.clone(), n);
    }
    Ok(counts)
}

/// Per-student buddy counts: for each assignment, the size of the clique
/// the student belongs to; 1 if they attempted it alone, 0 if they did
/// not attempt it.
#[derive(Debug, Clone, Serialize)]
pub struct BuddyRow {
    pub student: String,
    /// Clique size per assignment, in course order.
    pub per_assignment: Vec<usize>,
    /// Number of assignments where the student had at least one buddy.
    pub assignments_with_buddies: usize,
    /// Total buddy count over all assignments.
    pub total: usize,
}

/// Computes buddy counts for every student (and reference kind), sorted
/// by total descending.
#[must_use]
pub fn count_buddies(
    over: &CliqueMap,
    attempts: &HashMap<String, Vec<bool>>,
    config: &Config,
) -> Vec<BuddyRow> {
    let n = config.assignments.len();
    let mut buddies: HashMap<String, Vec<usize>> = attempts
        .iter()
        .map(|(student, did)| {
            (
                student.clone(),
                did.iter().map(|&d| usize::from(d)).collect(),
            )
        })
        .collect();
    for kind in &config.special_kinds {
        buddies.insert(kind.clone(), vec![0; n]);
    }

    for (anum, assignment) in config.assignments.iter().enumerate() {
        let Some(cliques) = over.get(assignment) else {
            continue;
        };
        for clique in cliques {
            for id in clique {
                if let Some(counts) = buddies.get_mut(id) {
                    counts[anum] = clique.len();
                }
            }
        }
    }

    let mut rows: Vec<BuddyRow> = buddies
        .into_iter()
        .map(|(student, per_assignment)| {
            let total = per_assignment.iter().sum();
            let assignments_with_buddies = per_assignment.iter().filter(|&&b| b > 1).count();
            BuddyRow {
                student,
                per_assignment,
                assignments_with_buddies,
                total,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.student.cmp(&b.student)));
    rows
}

/// One line per student: id, assignments with buddies, total buddies,
/// then the per-assignment counts.
#[must_use]
pub fn format_buddies(rows: &[BuddyRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "id   w/bud total per-assignment".cyan().bold());
    for row in rows {
        let _ = writeln!(
            out,
            "{:4} {:2} {:3}  {:?}",
            row.student, row.assignments_with_buddies, row.total, row.per_assignment
        );
    }
    out
}

/// Short confirmation line after a data file is written.
pub fn announce_written(path: &Path) {
    println!("\t- written to {}", path.display().to_string().dimmed());
}
