// src/metric.rs
//! Similarity Metric Library: pure scoring functions over line sequences.
//!
//! Set-based metrics (Tversky family) operate on de-duplicated line
//! content and ignore order and repetition. The sequence metric is
//! order-sensitive and junks blank lines during matching.

pub mod seqmatch;

use crate::error::{CahootsError, Result};
use crate::types::Metric;
use std::collections::HashSet;

/// Computes the Tversky index of two line sequences treated as sets:
/// `common / (common + alpha*|X-Y| + beta*|Y-X|)`.
///
/// Asymmetric whenever `alpha != beta`; swapping the arguments changes
/// the result.
///
/// # Errors
/// Returns `MetricDomain` if both sets are empty after dedup. That
/// indicates malformed upstream data and must never be scored as 0 or 100.
#[allow(clippy::cast_precision_loss)]
pub fn tversky(lines1: &[String], lines2: &[String], alpha: f64, beta: f64) -> Result<f64> {
    let set_x: HashSet<&str> = lines1.iter().map(String::as_str).collect();
    let set_y: HashSet<&str> = lines2.iter().map(String::as_str).collect();

    let common = set_x.intersection(&set_y).count();
    let x_minus_y = set_x.difference(&set_y).count();
    let y_minus_x = set_y.difference(&set_x).count();

    let denom = common as f64 + alpha * x_minus_y as f64 + beta * y_minus_x as f64;
    if denom == 0.0 {
        return Err(CahootsError::MetricDomain);
    }
    Ok(common as f64 / denom)
}

/// Symmetric set similarity: Tversky with alpha = beta = 1.
///
/// # Errors
/// Returns `MetricDomain` if both sets are empty after dedup.
pub fn jaccard(lines1: &[String], lines2: &[String]) -> Result<f64> {
    tversky(lines1, lines2, 1.0, 1.0)
}

/// Asymmetric containment: Tversky with alpha = 1, beta = 0.
///
/// Measures how much of the first sequence is explained by shared lines,
/// ignoring lines unique to the second. Approximates "how much of
/// submission 1 could have been derived from submission 2".
///
/// # Errors
/// Returns `MetricDomain` if the first set is empty after dedup.
pub fn tv_asymmetric(lines1: &[String], lines2: &[String]) -> Result<f64> {
    tversky(lines1, lines2, 1.0, 0.0)
}

/// Sequence-alignment ratio `2*M/T` over the two line sequences, where
/// blank lines are junked during matching but still count toward T.
#[must_use]
pub fn sequence_ratio(lines1: &[String], lines2: &[String]) -> f64 {
    seqmatch::SequenceMatcher::new(lines1, lines2).ratio()
}

/// Scores two submissions under the chosen metric as an integer
/// percentage in [0, 100].
///
/// # Errors
/// Returns `MetricDomain` for a set metric over an empty union; callers
/// must filter empty files before comparing.
pub fn compute_similarity(lines1: &[String], lines2: &[String], metric: Metric) -> Result<u8> {
    let value = match metric {
        Metric::Jaccard => jaccard(lines1, lines2)?,
        Metric::Tversky => tv_asymmetric(lines1, lines2)?,
        Metric::Sequence => sequence_ratio(lines1, lines2),
    };
    debug_assert!((0.0..=1.0).contains(&value), "metric out of range: {value}");
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((value * 100.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn jaccard_of_partial_overlap() {
        // common = 2, union = 4 -> 0.50
        let a = lines(&["x", "y", "z"]);
        let b = lines(&["x", "y", "w"]);
        let sim = jaccard(&a, &b).expect("non-empty sets");
        assert!((sim - 0.5).abs() < f64::EPSILON);
        assert_eq!(compute_similarity(&a, &b, Metric::Jaccard).unwrap(), 50);
    }

    #[test]
    fn jaccard_is_symmetric_and_reflexive() {
        let a = lines(&["p", "q", "r"]);
        let b = lines(&["q", "r", "s", "t"]);
        let ab = jaccard(&a, &b).unwrap();
        let ba = jaccard(&b, &a).unwrap();
        assert!((ab - ba).abs() < f64::EPSILON);
        assert!((jaccard(&a, &a).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn jaccard_ignores_order_and_multiplicity() {
        let a = lines(&["x", "x", "y"]);
        let b = lines(&["y", "x"]);
        assert!((jaccard(&a, &b).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn asymmetric_containment_depends_on_argument_order() {
        let a = lines(&["x", "y"]);
        let b = lines(&["x", "y", "z", "w"]);
        // All of a is explained by b: 2 / (2 + 0) = 1.0
        let ab = tv_asymmetric(&a, &b).unwrap();
        // Only half of b is explained by a: 2 / (2 + 2) = 0.5
        let ba = tv_asymmetric(&b, &a).unwrap();
        assert!((ab - 1.0).abs() < f64::EPSILON);
        assert!((ba - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_union_fails_loudly() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            jaccard(&empty, &empty),
            Err(CahootsError::MetricDomain)
        ));
    }

    #[test]
    fn metrics_stay_in_unit_interval() {
        let a = lines(&["a", "b", "c", "d"]);
        let b = lines(&["c", "d", "e"]);
        for metric in Metric::all() {
            let score = compute_similarity(&a, &b, metric).unwrap();
            assert!(score <= 100);
        }
    }

    #[test]
    fn sequence_ratio_is_order_sensitive() {
        let a = lines(&["one", "two", "three"]);
        let b = lines(&["three", "two", "one"]);
        let same = sequence_ratio(&a, &a);
        let reversed = sequence_ratio(&a, &b);
        assert!((same - 1.0).abs() < f64::EPSILON);
        assert!(reversed < same);
    }
}
