// src/types.rs
//! Core data model for the similarity-to-clique pipeline.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashMap;

/// A textual-similarity metric over two sequences of normalized lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Metric {
    /// Symmetric set overlap (Tversky with alpha = beta = 1).
    Jaccard,
    /// Asymmetric containment (Tversky with alpha = 1, beta = 0).
    Tversky,
    /// Order-sensitive sequence-alignment ratio, blank lines junked.
    Sequence,
}

impl Metric {
    /// Label used in data filenames and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Jaccard => "jaccard",
            Self::Tversky => "tversky",
            Self::Sequence => "sequence",
        }
    }

    /// All metrics, in the order runs are driven.
    #[must_use]
    pub fn all() -> [Metric; 3] {
        [Self::Jaccard, Self::Tversky, Self::Sequence]
    }
}

/// Preprocessing level of the submission text being compared.
/// Each level is a separately stored rendition of the same submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ProcLevel {
    /// Raw submission text.
    Orig,
    /// Cleaned text (comments and noise stripped).
    Clean,
    /// Tokenized text (identifiers normalized).
    Token,
}

impl ProcLevel {
    /// Label used in directory and data filenames.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Orig => "orig",
            Self::Clean => "clean",
            Self::Token => "token",
        }
    }

    /// All preprocessing levels, in run order.
    #[must_use]
    pub fn all() -> [ProcLevel; 3] {
        [Self::Orig, Self::Clean, Self::Token]
    }
}

/// One pairwise similarity score between two submissions.
///
/// Both directions are recorded (and self-pairs too): metrics may be
/// asymmetric, so `(s1, s2)` and `(s2, s1)` are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityRecord {
    pub student1: String,
    pub assignment1: String,
    pub student2: String,
    pub assignment2: String,
    /// Integer percentage in [0, 100].
    pub score: u8,
}

impl SimilarityRecord {
    /// True for a comparison of one student against themselves.
    #[must_use]
    pub fn is_self_pair(&self) -> bool {
        self.student1 == self.student2
    }

    /// True when both sides belong to the same assignment.
    #[must_use]
    pub fn same_assignment(&self) -> bool {
        self.assignment1 == self.assignment2
    }
}

/// One similarity score between a reference solution and a student
/// submission. The reference side carries a kind label (e.g. `CIRC`),
/// not a student id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialRecord {
    /// Which reference set the solution came from.
    pub kind: String,
    pub assignment1: String,
    pub student: String,
    pub assignment2: String,
    pub score: u8,
}

/// A set of submissions transitively linked by over-threshold similarity.
///
/// Members are stored in insertion order; only final set membership is
/// meaningful to consumers.
pub type Clique = Vec<String>;

/// Residual below-threshold scores, keyed by ordered student pair.
/// Used to annotate inter-clique relationships without recomputation.
pub type ResidualMap = HashMap<(String, String), u8>;

/// The outcome of partitioning one run's records by a threshold.
///
/// Both maps are keyed by assignment. `over` feeds the clique builder,
/// `under` is retained verbatim as the residual-distance map.
#[derive(Debug, Clone, Default)]
pub struct ThresholdSplit {
    pub over: HashMap<String, Vec<(String, String)>>,
    pub under: HashMap<String, ResidualMap>,
}

/// Cliques for every assignment of one run, keyed by assignment.
pub type CliqueMap = HashMap<String, Vec<Clique>>;
