// src/pipeline.rs
//! End-to-end drive of one (metric, level, threshold) run: read the
//! stored similarity records, split by threshold, build cliques per
//! assignment, and optionally fold in the reference solutions.
//!
//! Every run allocates fresh structures; nothing is shared across the
//! metric x preprocessing-level grid.

use crate::cliques;
use crate::config::Config;
use crate::error::Result;
use crate::records;
use crate::specials;
use crate::types::{CliqueMap, Metric, ProcLevel, ResidualMap};
use std::collections::HashMap;

/// Cliques and residual distances for one run, keyed by assignment.
pub struct RunOutcome {
    pub over: CliqueMap,
    pub under: HashMap<String, ResidualMap>,
}

/// Reads one run's data files and produces its clique partition.
///
/// With `with_specials`, the reference-solution records are integrated
/// after the student partition is built; the integration never merges
/// student cliques.
///
/// # Errors
/// Fails on unreadable or malformed data files, unknown assignments, or
/// a broken partition invariant.
pub fn gather_cliques(
    config: &Config,
    metric: Metric,
    proc: ProcLevel,
    threshold: u8,
    with_specials: bool,
) -> Result<RunOutcome> {
    let data_file = config.data_file(metric, proc);
    let similarity = records::read_similarity_file(&data_file)?;
    let split = cliques::split_by_threshold(&similarity, threshold, config)?;

    let mut over: CliqueMap = HashMap::new();
    for (assignment, pairs) in &split.over {
        over.insert(assignment.clone(), cliques::build_cliques(pairs)?);
    }

    if with_specials {
        let special_file = config.special_file(metric, proc);
        let special = records::read_special_file(&special_file)?;
        specials::integrate_special(&mut over, &special, threshold)?;
    }

    Ok(RunOutcome {
        over,
        under: split.under,
    })
}
