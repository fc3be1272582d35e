// src/compare.rs
//! Pairwise Comparator: all-pairs similarity over one submission directory.
//!
//! Every ordered pair is scored, self-pairs included, because the chosen
//! metric may be asymmetric and downstream consumers want both directions.
//! Output order is canonical: lexicographic by the concatenation of the
//! two filenames, regardless of how the work was scheduled.

use crate::error::{CahootsError, Result};
use crate::metric;
use crate::types::{Metric, SimilarityRecord};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// A scored ordered pair of submission filenames.
pub type ScoredPair = (String, String, u8);

static PAIR_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^-]+)-(.+)$").unwrap_or_else(|_| panic!("Invalid Regex")));

/// Lists submission filenames in `dir` with the configured suffix, sorted.
///
/// # Errors
/// Fails if the directory cannot be walked.
pub fn list_submissions(dir: &Path, suffix: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(suffix) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Reads each listed submission and drops the ones with no content lines.
///
/// An unreadable file aborts the run: missing submissions are a
/// configuration error, not a data condition to route around.
///
/// # Errors
/// Fails on walk or read errors.
pub fn read_nonempty(dir: &Path, suffix: &str) -> Result<Vec<(String, Vec<String>)>> {
    let names = list_submissions(dir, suffix)?;
    let mut loaded = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let content = fs::read_to_string(&path).map_err(|e| CahootsError::io(e, &path))?;
        let lines: Vec<String> = content.lines().map(ToString::to_string).collect();
        if lines.is_empty() {
            continue;
        }
        loaded.push((name, lines));
    }
    Ok(loaded)
}

/// Compares every ordered pair of submissions in `dir` under `metric`,
/// returning integer percentage scores in canonical order.
///
/// The outer sweep runs on the rayon pool; the final sort restores the
/// lexicographic record order the clique builder and report re-pairing
/// depend on.
///
/// # Errors
/// Fails if any file is unreadable or a set metric hits an empty union.
pub fn compare_directory(dir: &Path, suffix: &str, metric: Metric) -> Result<Vec<ScoredPair>> {
    let files = read_nonempty(dir, suffix)?;
    let done = AtomicUsize::new(0);
    let total = files.len();

    let nested: Vec<Vec<ScoredPair>> = files
        .par_iter()
        .map(|(name1, lines1)| {
            let mut scores = Vec::with_capacity(files.len());
            for (name2, lines2) in &files {
                let score = metric::compute_similarity(lines1, lines2, metric)?;
                scores.push((name1.clone(), name2.clone(), score));
            }
            report_progress(&done, total);
            Ok(scores)
        })
        .collect::<Result<_>>()?;

    let mut scores: Vec<ScoredPair> = nested.into_iter().flatten().collect();
    scores.sort_by_cached_key(|(file1, file2, _)| format!("{file1}{file2}"));
    Ok(scores)
}

/// Prints coarse percentage checkpoints for the outer sweep.
/// Cosmetic only; never alters output order or values.
fn report_progress(done: &AtomicUsize, total: usize) {
    if total == 0 {
        return;
    }
    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
    let pct = finished * 100 / total;
    let prev = (finished - 1) * 100 / total;
    if pct / 10 > prev / 10 {
        print!("{}% ", pct / 10 * 10);
        let _ = std::io::stdout().flush();
    }
}

/// Splits a submission filename into its id and assignment fields.
///
/// # Errors
/// Fails if the name does not have the `<id>-<assignment>` shape.
pub fn split_pair_name(name: &str) -> Result<(String, String)> {
    let caps = PAIR_NAME_RE
        .captures(name)
        .ok_or_else(|| CahootsError::Other(format!("malformed submission filename: {name}")))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Converts scored filename pairs into similarity records.
///
/// # Errors
/// Fails if any filename lacks the `<id>-<assignment>` shape.
pub fn to_records(scores: &[ScoredPair]) -> Result<Vec<SimilarityRecord>> {
    scores
        .iter()
        .map(|(file1, file2, score)| {
            let (student1, assignment1) = split_pair_name(file1)?;
            let (student2, assignment2) = split_pair_name(file2)?;
            Ok(SimilarityRecord {
                student1,
                assignment1,
                student2,
                assignment2,
                score: *score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_filenames_on_the_first_dash() {
        let (id, assignment) = split_pair_name("002-Circuit_1.v").expect("well-formed");
        assert_eq!(id, "002");
        assert_eq!(assignment, "Circuit_1.v");
    }

    #[test]
    fn rejects_names_without_a_separator() {
        assert!(split_pair_name("Circuit_1.v").is_err());
    }

    #[test]
    fn records_keep_both_directions() {
        let scores = vec![
            ("002-A.v".to_string(), "003-A.v".to_string(), 60),
            ("003-A.v".to_string(), "002-A.v".to_string(), 55),
        ];
        let records = to_records(&scores).expect("well-formed");
        assert_eq!(records[0].student1, "002");
        assert_eq!(records[1].student1, "003");
        assert_ne!(records[0].score, records[1].score);
    }
}
