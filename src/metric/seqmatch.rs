// src/metric/seqmatch.rs
//! Greedy longest-matching-block sequence alignment over lines.
//!
//! Port of the classic diff-style matcher used for the `sequence` metric:
//! whitespace-only lines are junked (never anchor a match, but still count
//! toward total length in the ratio), and wildly popular lines in long
//! inputs are dropped as anchors to keep the alignment meaningful.

use std::collections::{HashMap, HashSet};

/// Inputs at least this long get popular-element suppression.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

/// Matches two line sequences and reports their similarity ratio.
pub struct SequenceMatcher<'a> {
    a: &'a [String],
    b: &'a [String],
    /// Line content -> sorted positions in `b`, junk and popular lines removed.
    b2j: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    #[must_use]
    pub fn new(a: &'a [String], b: &'a [String]) -> Self {
        let mut b2j: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (j, line) in b.iter().enumerate() {
            b2j.entry(line.as_str()).or_default().push(j);
        }

        b2j.retain(|line, _| !is_junk(line));

        // Suppress popular lines in long inputs (over 1% of positions).
        if b.len() >= AUTOJUNK_MIN_LEN {
            let cutoff = b.len() / 100 + 1;
            let popular: HashSet<&str> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > cutoff)
                .map(|(line, _)| *line)
                .collect();
            b2j.retain(|line, _| !popular.contains(line));
        }

        Self { a, b, b2j }
    }

    /// Similarity in [0, 1]: `2*M/T` where M is the total matched line
    /// count and T the combined length of both sequences.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * matches as f64 / total as f64
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size > 0 {
                if alo < m.a && blo < m.b {
                    queue.push((alo, m.a, blo, m.b));
                }
                if m.a + m.size < ahi && m.b + m.size < bhi {
                    queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
                }
                blocks.push(m);
            }
        }

        blocks
    }

    /// Finds the longest block of matching lines in
    /// `a[alo..ahi]` x `b[blo..bhi]`.
    ///
    /// Of all maximal blocks, returns the one starting earliest in `a`
    /// (then earliest in `b`). Junk lines never start or end a block but
    /// may be absorbed by the final extension pass when they line up.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut besti = alo;
        let mut bestj = blo;
        let mut bestsize = 0;

        // j2len[j] = length of the longest match ending at a[i-1], b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(self.a[i].as_str()) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j == 0 {
                        1
                    } else {
                        j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                    };
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Widen over equal non-junk lines at each edge, then over equal
        // junk lines. Junk can only ride along, never anchor.
        let (mut besti, mut bestj, mut bestsize) =
            self.extend(besti, bestj, bestsize, alo, ahi, blo, bhi, false);
        (besti, bestj, bestsize) = self.extend(besti, bestj, bestsize, alo, ahi, blo, bhi, true);

        Block {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn extend(
        &self,
        mut besti: usize,
        mut bestj: usize,
        mut bestsize: usize,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
        junk_phase: bool,
    ) -> (usize, usize, usize) {
        while besti > alo
            && bestj > blo
            && is_junk(&self.b[bestj - 1]) == junk_phase
            && self.a[besti - 1] == self.b[bestj - 1]
        {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && is_junk(&self.b[bestj + bestsize]) == junk_phase
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }
        (besti, bestj, bestsize)
    }
}

/// Whitespace-only lines are junk for matching purposes.
fn is_junk(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn identical_sequences_score_one() {
        let a = lines(&["alpha", "beta", "gamma"]);
        let sm = SequenceMatcher::new(&a, &a);
        assert!((sm.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_sequences_score_zero() {
        let a = lines(&["one", "two"]);
        let b = lines(&["three", "four"]);
        let sm = SequenceMatcher::new(&a, &b);
        assert!(sm.ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn partial_overlap_counts_matched_lines_twice() {
        // One common line out of 2 + 2 total: 2*1/4 = 0.5
        let a = lines(&["shared", "only-a"]);
        let b = lines(&["shared", "only-b"]);
        let sm = SequenceMatcher::new(&a, &b);
        assert!((sm.ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_lines_do_not_anchor_matches_but_count_in_total() {
        // The blank line is junk: it cannot anchor a match, so only the
        // two real lines match. 2*2/(3+3) = 0.666...
        let a = lines(&["x", "", "y"]);
        let b = lines(&["", "x", "y"]);
        let sm = SequenceMatcher::new(&a, &b);
        let expected = 2.0 * 2.0 / 6.0;
        assert!((sm.ratio() - expected).abs() < 1e-9);
    }

    #[test]
    fn aligned_blank_lines_ride_along() {
        // Junk between matched lines extends the block when it lines up
        // on both sides: all three lines match.
        let a = lines(&["x", "", "y"]);
        let b = lines(&["x", "", "y"]);
        let sm = SequenceMatcher::new(&a, &b);
        assert!((sm.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reordering_reduces_the_ratio() {
        let a = lines(&["a", "b", "c", "d"]);
        let b = lines(&["c", "d", "a", "b"]);
        let sm = SequenceMatcher::new(&a, &b);
        // Greedy alignment keeps only one of the two swapped halves.
        assert!((sm.ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn prefers_earliest_block_on_ties() {
        let a = lines(&["m", "n"]);
        let b = lines(&["m", "z", "m"]);
        let sm = SequenceMatcher::new(&a, &b);
        let block = sm.find_longest_match(0, a.len(), 0, b.len());
        assert_eq!((block.a, block.b, block.size), (0, 0, 1));
    }
}
