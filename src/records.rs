// src/records.rs
//! Line-oriented record formats consumed and produced by the pipeline.
//!
//! Similarity files hold one record per line, no header:
//! `"<student1>-<assignment1> <student2>-<assignment2> <score>"`.
//! Reference-solution files use the same layout with a kind label in the
//! first field: `"<kind>-<assignment1> <student>-<assignment2> <score>"`.

use crate::error::{CahootsError, Result};
use crate::types::{SimilarityRecord, SpecialRecord};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Reads and parses a similarity data file.
///
/// # Errors
/// Fails if the file is unreadable or any line is malformed; partial
/// results are never returned.
pub fn read_similarity_file(path: &Path) -> Result<Vec<SimilarityRecord>> {
    let content = fs::read_to_string(path).map_err(|e| CahootsError::io(e, path))?;
    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let f = split_fields(line, path, i + 1)?;
            Ok(SimilarityRecord {
                student1: f.0,
                assignment1: f.1,
                student2: f.2,
                assignment2: f.3,
                score: f.4,
            })
        })
        .collect()
}

/// Reads and parses a reference-solution similarity file.
///
/// # Errors
/// Fails if the file is unreadable or any line is malformed.
pub fn read_special_file(path: &Path) -> Result<Vec<SpecialRecord>> {
    let content = fs::read_to_string(path).map_err(|e| CahootsError::io(e, path))?;
    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let f = split_fields(line, path, i + 1)?;
            Ok(SpecialRecord {
                kind: f.0,
                assignment1: f.1,
                student: f.2,
                assignment2: f.3,
                score: f.4,
            })
        })
        .collect()
}

/// Formats scored filename pairs as similarity data lines.
///
/// The filenames already carry the `<id>-<assignment>` shape, so they are
/// written as-is; readers split on the separator.
#[must_use]
pub fn format_lines(scores: &[(String, String, u8)]) -> String {
    let mut out = String::new();
    for (file1, file2, score) in scores {
        let _ = writeln!(out, "{file1} {file2} {score}");
    }
    out
}

/// Writes scored filename pairs to a data file, one record per line.
///
/// # Errors
/// Fails if the file cannot be written.
pub fn write_score_file(path: &Path, scores: &[(String, String, u8)]) -> Result<()> {
    fs::write(path, format_lines(scores)).map_err(|e| CahootsError::io(e, path))
}

/// Splits one record line into its five fields.
///
/// The id and assignment inside each filename field are joined by `-`, so
/// the line is tokenized on whitespace and dashes together. Assignment
/// names themselves never contain a dash (underscores by convention).
fn split_fields(line: &str, path: &Path, lineno: usize) -> Result<(String, String, String, String, u8)> {
    let fields: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == crate::config::FILENAME_SEP)
        .filter(|s| !s.is_empty())
        .collect();

    let [id1, a1, id2, a2, score] = fields.as_slice() else {
        return Err(CahootsError::Parse {
            path: path.to_path_buf(),
            line: lineno,
            reason: format!("expected 5 fields, found {}", fields.len()),
        });
    };

    let score: u8 = score.parse().map_err(|_| CahootsError::Parse {
        path: path.to_path_buf(),
        line: lineno,
        reason: format!("score is not an integer: {score}"),
    })?;
    if score > 100 {
        return Err(CahootsError::Parse {
            path: path.to_path_buf(),
            line: lineno,
            reason: format!("score out of range: {score}"),
        });
    }

    Ok((
        (*id1).to_string(),
        (*a1).to_string(),
        (*id2).to_string(),
        (*a2).to_string(),
        score,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(content.as_bytes()).expect("write");
        f
    }

    #[test]
    fn parses_similarity_lines() {
        let f = write_temp("002-Compare.v 005-Compare.v 73\n005-Compare.v 002-Compare.v 70\n");
        let records = read_similarity_file(f.path()).expect("parse ok");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student1, "002");
        assert_eq!(records[0].assignment1, "Compare.v");
        assert_eq!(records[0].score, 73);
        // Both directions survive: the metric may be asymmetric.
        assert_eq!(records[1].score, 70);
    }

    #[test]
    fn parses_special_lines() {
        let f = write_temp("CIRC-AdderSub.v 014-AdderSub.v 88\n");
        let records = read_special_file(f.path()).expect("parse ok");
        assert_eq!(records[0].kind, "CIRC");
        assert_eq!(records[0].student, "014");
        assert_eq!(records[0].score, 88);
    }

    #[test]
    fn malformed_line_is_fatal_with_location() {
        let f = write_temp("002-Compare.v 005-Compare.v 73\ngarbage line\n");
        let err = read_similarity_file(f.path()).unwrap_err();
        match err {
            CahootsError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn score_above_100_is_rejected() {
        let f = write_temp("002-Compare.v 005-Compare.v 101\n");
        assert!(read_similarity_file(f.path()).is_err());
    }

    #[test]
    fn round_trips_through_the_line_format() {
        let scores = vec![
            ("002-Compare.v".to_string(), "005-Compare.v".to_string(), 73),
            ("003-AdderSub.v".to_string(), "003-AdderSub.v".to_string(), 100),
        ];
        let f = tempfile::NamedTempFile::new().expect("temp file");
        write_score_file(f.path(), &scores).expect("write ok");
        let records = read_similarity_file(f.path()).expect("parse ok");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].student1, "003");
        assert_eq!(records[1].score, 100);
        assert!(records[1].is_self_pair());
    }
}
