// src/cliques.rs
//! Clique Builder: threshold split and transitive-closure partitioning.
//!
//! A clique here is a set of students connected by a chain of
//! over-threshold pairwise links, not necessarily all-pairs
//! over-threshold. The builder is an incremental union of an arena of
//! clique slots; the result equals the connected components of the pair
//! graph.

use crate::config::Config;
use crate::error::{CahootsError, Result};
use crate::types::{Clique, SimilarityRecord, ThresholdSplit};
use std::collections::HashMap;

/// Partitions one run's records by `threshold`, per assignment.
///
/// Only same-assignment, different-student records count: self-pairs and
/// cross-assignment comparisons are computed upstream but discarded here.
/// `over` collects the related pairs in record order; `under` keeps the
/// residual score per pair for later inter-clique annotation.
///
/// # Errors
/// Fails if a record names an assignment the configuration does not know.
pub fn split_by_threshold(
    records: &[SimilarityRecord],
    threshold: u8,
    config: &Config,
) -> Result<ThresholdSplit> {
    let mut split = ThresholdSplit::default();
    for assignment in &config.assignments {
        split.over.insert(assignment.clone(), Vec::new());
        split.under.insert(assignment.clone(), HashMap::new());
    }

    for record in records {
        if !record.same_assignment() || record.is_self_pair() {
            continue;
        }
        if record.score >= threshold {
            split
                .over
                .get_mut(&record.assignment1)
                .ok_or_else(|| CahootsError::UnknownAssignment(record.assignment1.clone()))?
                .push((record.student1.clone(), record.student2.clone()));
        } else {
            split
                .under
                .get_mut(&record.assignment1)
                .ok_or_else(|| CahootsError::UnknownAssignment(record.assignment1.clone()))?
                .insert(
                    (record.student1.clone(), record.student2.clone()),
                    record.score,
                );
        }
    }

    Ok(split)
}

/// Arena-based incremental partitioner. Each clique lives in a slot;
/// merged cliques leave an empty slot behind so surviving cliques keep
/// their formation order.
struct CliqueArena {
    slots: Vec<Option<Clique>>,
    member: HashMap<String, usize>,
}

impl CliqueArena {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            member: HashMap::new(),
        }
    }

    fn add_pair(&mut self, s1: &str, s2: &str) {
        match (self.member.get(s1).copied(), self.member.get(s2).copied()) {
            // Neither is known yet: a new clique is born.
            (None, None) => {
                let slot = self.slots.len();
                self.slots.push(Some(vec![s1.to_string(), s2.to_string()]));
                self.member.insert(s1.to_string(), slot);
                self.member.insert(s2.to_string(), slot);
            }
            // One side is known: the other joins its clique.
            (Some(slot), None) => self.push_member(slot, s2),
            (None, Some(slot)) => self.push_member(slot, s1),
            // Redundant edge inside one clique.
            (Some(a), Some(b)) if a == b => {}
            // Linked across two cliques: the first absorbs the second.
            (Some(a), Some(b)) => self.merge(a, b),
        }
    }

    fn push_member(&mut self, slot: usize, id: &str) {
        if let Some(clique) = &mut self.slots[slot] {
            clique.push(id.to_string());
        }
        self.member.insert(id.to_string(), slot);
    }

    fn merge(&mut self, into: usize, from: usize) {
        let absorbed = self.slots[from].take().unwrap_or_default();
        for id in &absorbed {
            self.member.insert(id.clone(), into);
        }
        if let Some(clique) = &mut self.slots[into] {
            clique.extend(absorbed);
        }
    }

    fn into_cliques(self) -> Result<Vec<Clique>> {
        let cliques: Vec<Clique> = self.slots.into_iter().flatten().collect();

        // Defensive: the membership map guarantees one slot per student,
        // so any duplicate across cliques is a builder bug.
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (i, clique) in cliques.iter().enumerate() {
            for id in clique {
                if let Some(other) = seen.insert(id, i) {
                    return Err(CahootsError::InvariantViolation(format!(
                        "student {id} appears in cliques {other} and {i}"
                    )));
                }
            }
        }

        Ok(cliques)
    }
}

/// Partitions the students named by `pairs` into cliques: the connected
/// components of the pair graph, sorted by size descending. Equal-size
/// cliques keep the order in which they were first formed. Students who
/// never appear in a pair are absent from the output entirely.
///
/// # Errors
/// Fails with `InvariantViolation` if the partition invariant breaks
/// (a student in two cliques), which indicates a builder bug.
pub fn build_cliques(pairs: &[(String, String)]) -> Result<Vec<Clique>> {
    let mut arena = CliqueArena::new();
    for (s1, s2) in pairs {
        arena.add_pair(s1, s2);
    }
    let mut cliques = arena.into_cliques()?;
    // Stable sort: ties keep formation order.
    cliques.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(cliques)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect()
    }

    fn as_sets(cliques: &[Clique]) -> Vec<std::collections::BTreeSet<String>> {
        cliques
            .iter()
            .map(|c| c.iter().cloned().collect())
            .collect()
    }

    #[test]
    fn chains_collapse_into_one_clique() {
        let cliques = build_cliques(&pairs(&[("A", "B"), ("B", "C"), ("D", "E")])).unwrap();
        assert_eq!(cliques.len(), 2);
        // Sorted by size: {A,B,C} before {D,E}.
        assert_eq!(cliques[0], vec!["A", "B", "C"]);
        assert_eq!(cliques[1], vec!["D", "E"]);
    }

    #[test]
    fn late_edge_merges_two_existing_cliques() {
        let cliques = build_cliques(&pairs(&[("A", "B"), ("C", "D"), ("B", "C")])).unwrap();
        assert_eq!(cliques.len(), 1);
        let members: std::collections::BTreeSet<_> = cliques[0].iter().cloned().collect();
        assert_eq!(members.len(), 4);
    }

    #[test]
    fn redundant_edges_are_no_ops() {
        let cliques =
            build_cliques(&pairs(&[("A", "B"), ("A", "B"), ("B", "A")])).unwrap();
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0].len(), 2);
    }

    #[test]
    fn unpaired_students_are_absent() {
        let cliques = build_cliques(&pairs(&[("A", "B")])).unwrap();
        assert!(!cliques.iter().flatten().any(|s| s == "Z"));
    }

    #[test]
    fn equal_size_cliques_keep_formation_order() {
        let cliques =
            build_cliques(&pairs(&[("P", "Q"), ("X", "Y"), ("M", "N")])).unwrap();
        assert_eq!(as_sets(&cliques), as_sets(&[
            vec!["P".to_string(), "Q".to_string()],
            vec!["X".to_string(), "Y".to_string()],
            vec!["M".to_string(), "N".to_string()],
        ]));
    }

    #[test]
    fn partition_covers_exactly_the_paired_students() {
        let input = pairs(&[("A", "B"), ("B", "C"), ("D", "E"), ("E", "A")]);
        let cliques = build_cliques(&input).unwrap();
        let mut members: Vec<&String> = cliques.iter().flatten().collect();
        members.sort();
        members.dedup();
        let mut expected: Vec<&String> =
            input.iter().flat_map(|(a, b)| [a, b]).collect();
        expected.sort();
        expected.dedup();
        assert_eq!(members, expected);
    }
}
