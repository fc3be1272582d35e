// src/specials.rs
//! Special-Reference Integrator: fold externally supplied reference
//! solutions (instructor samples, circulated solutions) into an existing
//! clique partition without re-running the full pairwise comparison.

use crate::compare::{self, ScoredPair};
use crate::error::{CahootsError, Result};
use crate::types::{CliqueMap, Metric, SpecialRecord};
use rayon::prelude::*;
use std::path::Path;

/// Compares every reference solution against every student submission:
/// 1xN rather than NxN. Skip, ordering, and error rules match the
/// pairwise comparator.
///
/// # Errors
/// Fails if any file is unreadable or a set metric hits an empty union.
pub fn compare_one_vs_all(
    special_dir: &Path,
    student_dir: &Path,
    suffix: &str,
    metric: Metric,
) -> Result<Vec<ScoredPair>> {
    let specials = compare::read_nonempty(special_dir, suffix)?;
    let students = compare::read_nonempty(student_dir, suffix)?;

    let nested: Vec<Vec<ScoredPair>> = specials
        .par_iter()
        .map(|(name1, lines1)| {
            let mut scores = Vec::with_capacity(students.len());
            for (name2, lines2) in &students {
                let score = crate::metric::compute_similarity(lines1, lines2, metric)?;
                scores.push((name1.clone(), name2.clone(), score));
            }
            Ok(scores)
        })
        .collect::<Result<_>>()?;

    let mut scores: Vec<ScoredPair> = nested.into_iter().flatten().collect();
    scores.sort_by_cached_key(|(file1, file2, _)| format!("{file1}{file2}"));
    Ok(scores)
}

/// Extends an existing partition with reference pairs meeting `threshold`.
///
/// For each over-threshold same-assignment record, the reference kind is
/// appended to the clique its student already belongs to; a student with
/// no prior clique gets a fresh `{student, kind}` entry. This is pure
/// list mutation: no transitive closure is recomputed, no re-sort is
/// applied, and a reference similar to students in two different cliques
/// is added to both. That duplication is documented behavior, not a bug.
///
/// # Errors
/// Fails if a record names an assignment with no clique list.
pub fn integrate_special(
    cliques: &mut CliqueMap,
    specials: &[SpecialRecord],
    threshold: u8,
) -> Result<()> {
    for record in specials {
        if record.assignment1 != record.assignment2 || record.score < threshold {
            continue;
        }
        let assignment_cliques = cliques
            .get_mut(&record.assignment1)
            .ok_or_else(|| CahootsError::UnknownAssignment(record.assignment1.clone()))?;

        match assignment_cliques
            .iter_mut()
            .find(|c| c.iter().any(|id| id == &record.student))
        {
            // Cliques are duplicate-free: a second record landing in the
            // same clique adds nothing.
            Some(clique) => {
                if !clique.contains(&record.kind) {
                    clique.push(record.kind.clone());
                }
            }
            None => assignment_cliques.push(vec![record.student.clone(), record.kind.clone()]),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn special(kind: &str, assignment: &str, student: &str, score: u8) -> SpecialRecord {
        SpecialRecord {
            kind: kind.to_string(),
            assignment1: assignment.to_string(),
            student: student.to_string(),
            assignment2: assignment.to_string(),
            score,
        }
    }

    fn one_assignment(cliques: Vec<Vec<&str>>) -> CliqueMap {
        let mut map = HashMap::new();
        map.insert(
            "A.v".to_string(),
            cliques
                .into_iter()
                .map(|c| c.into_iter().map(ToString::to_string).collect())
                .collect(),
        );
        map
    }

    #[test]
    fn reference_joins_the_students_clique() {
        let mut cliques = one_assignment(vec![vec!["002", "005"]]);
        integrate_special(&mut cliques, &[special("CIRC", "A.v", "005", 95)], 90).unwrap();
        assert_eq!(cliques["A.v"][0], vec!["002", "005", "CIRC"]);
    }

    #[test]
    fn below_threshold_records_are_ignored() {
        let mut cliques = one_assignment(vec![vec!["002", "005"]]);
        integrate_special(&mut cliques, &[special("CIRC", "A.v", "005", 89)], 90).unwrap();
        assert_eq!(cliques["A.v"][0].len(), 2);
    }

    #[test]
    fn student_without_a_clique_gets_a_fresh_entry() {
        let mut cliques = one_assignment(vec![vec!["002", "005"]]);
        integrate_special(&mut cliques, &[special("INST", "A.v", "077", 92)], 90).unwrap();
        // No multi-student merge: a new two-element entry appears.
        assert_eq!(cliques["A.v"].len(), 2);
        assert_eq!(cliques["A.v"][1], vec!["077", "INST"]);
    }

    #[test]
    fn reference_may_be_duplicated_across_cliques() {
        let mut cliques = one_assignment(vec![vec!["002", "005"], vec!["010", "011"]]);
        let records = [
            special("CIRC", "A.v", "002", 95),
            special("CIRC", "A.v", "011", 95),
        ];
        integrate_special(&mut cliques, &records, 90).unwrap();
        assert!(cliques["A.v"][0].contains(&"CIRC".to_string()));
        assert!(cliques["A.v"][1].contains(&"CIRC".to_string()));
    }

    #[test]
    fn reference_joins_a_clique_only_once() {
        let mut cliques = one_assignment(vec![vec!["002", "005"]]);
        let records = [
            special("CIRC", "A.v", "002", 95),
            special("CIRC", "A.v", "005", 95),
        ];
        integrate_special(&mut cliques, &records, 90).unwrap();
        let circs = cliques["A.v"][0].iter().filter(|id| *id == "CIRC").count();
        assert_eq!(circs, 1);
    }

    #[test]
    fn cross_assignment_records_are_skipped() {
        let mut cliques = one_assignment(vec![vec!["002", "005"]]);
        let mut record = special("CIRC", "A.v", "002", 99);
        record.assignment2 = "B.v".to_string();
        integrate_special(&mut cliques, &[record], 90).unwrap();
        assert_eq!(cliques["A.v"][0].len(), 2);
    }
}
