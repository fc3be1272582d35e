// src/config.rs
//! Run configuration: assignment list, student roster, directory layout.
//!
//! Everything the pipeline needs to know about the course is carried in one
//! immutable `Config` value handed to each component, loadable from a local
//! `cahoots.toml`.

use crate::error::{CahootsError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional local configuration file.
pub const LOCAL_CONFIG: &str = "cahoots.toml";

/// Separator used in submission filenames (`002-Compare.v`) and data files.
pub const FILENAME_SEP: char = '-';

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filenames of the assignments, in course order.
    pub assignments: Vec<String>,
    /// Anonymised student ids, zero-padded.
    pub students: Vec<String>,
    /// Root directory for similarity data and derived reports.
    pub results_dir: PathBuf,
    /// Suffix of the submission files to compare (one kind per run).
    pub submission_suffix: String,
    /// Suffix for the similarity data files we read and write.
    pub data_suffix: String,
    /// Labels of the external reference solutions (instructor, circulated).
    pub special_kinds: Vec<String>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: default_assignments(),
            students: default_students(),
            results_dir: PathBuf::from("results"),
            submission_suffix: ".v".to_string(),
            data_suffix: ".dat".to_string(),
            special_kinds: vec!["CIRC".to_string(), "INST".to_string()],
        }
    }

    /// Loads configuration from a TOML file, falling back to defaults for
    /// missing keys.
    ///
    /// # Errors
    /// Returns an error if the file is unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CahootsError::io(e, path))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| CahootsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `cahoots.toml` from the working directory if present,
    /// otherwise returns the default course setup.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_local() -> Result<Self> {
        let path = Path::new(LOCAL_CONFIG);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the assignment list or roster is empty.
    pub fn validate(&self) -> Result<()> {
        if self.assignments.is_empty() {
            return Err(CahootsError::Config("no assignments defined".to_string()));
        }
        if self.students.is_empty() {
            return Err(CahootsError::Config("student roster is empty".to_string()));
        }
        Ok(())
    }

    /// Directory holding the latest submission of each student, for one
    /// preprocessing level.
    #[must_use]
    pub fn latest_dir(&self, proc: crate::types::ProcLevel) -> PathBuf {
        self.results_dir
            .join(format!("latest{FILENAME_SEP}{}", proc.label()))
    }

    /// Directory holding the reference solutions, for one preprocessing level.
    #[must_use]
    pub fn special_dir(&self, proc: crate::types::ProcLevel) -> PathBuf {
        self.results_dir
            .join(format!("special{FILENAME_SEP}{}", proc.label()))
    }

    /// Path of the similarity data file for one metric/level combination.
    #[must_use]
    pub fn data_file(&self, metric: crate::types::Metric, proc: crate::types::ProcLevel) -> PathBuf {
        self.results_dir.join(format!(
            "{}{FILENAME_SEP}{}{}",
            metric.label(),
            proc.label(),
            self.data_suffix
        ))
    }

    /// Path of the reference-solution similarity file for one combination.
    #[must_use]
    pub fn special_file(
        &self,
        metric: crate::types::Metric,
        proc: crate::types::ProcLevel,
    ) -> PathBuf {
        self.results_dir.join(format!(
            "special{FILENAME_SEP}{}{FILENAME_SEP}{}{}",
            metric.label(),
            proc.label(),
            self.data_suffix
        ))
    }

}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_assignments() -> Vec<String> {
    [
        "Circuit_1.v",
        "Circuit_2.v",
        "UDP_Majority_4.v",
        "AdderSub.v",
        "Compare.v",
        "DecimalAdder.v",
        "OddFunction.v",
        "FiniteStateMachine.v",
        "StateDiagram.v",
        "SerialComplementer.v",
        "Counter_1.v",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

// Students are numbered from 002 to 114 inclusive.
fn default_students() -> Vec<String> {
    (2..115).map(|d| format!("{d:03}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_matches_course_setup() {
        let config = Config::new();
        assert_eq!(config.assignments.len(), 11);
        assert_eq!(config.students.len(), 113);
        assert_eq!(config.students.first().map(String::as_str), Some("002"));
        assert_eq!(config.students.last().map(String::as_str), Some("114"));
    }

    #[test]
    fn data_file_paths_use_metric_and_level() {
        let config = Config::new();
        let path = config.data_file(crate::types::Metric::Jaccard, crate::types::ProcLevel::Token);
        assert!(path.ends_with("jaccard-token.dat"));
        let special =
            config.special_file(crate::types::Metric::Sequence, crate::types::ProcLevel::Orig);
        assert!(special.ends_with("special-sequence-orig.dat"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(r#"results_dir = "out""#).expect("valid toml");
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.assignments.len(), 11);
    }

    #[test]
    fn empty_roster_fails_validation() {
        let mut config = Config::new();
        config.students.clear();
        assert!(config.validate().is_err());
    }
}
