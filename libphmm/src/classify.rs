//! Splits a batch of decoded paths into two score populations.
//!
//! Paths are bucketed by their score per state relative to the batch
//! average, and the threshold is the midpoint of the two buckets' mean
//! raw scores. This is a heuristic: it does not account for variance
//! and is not calibrated against known labels.

use crate::align::structs::ViterbiPath;
use crate::error::InvalidInputError;
use crate::util::VecMath;

use anyhow::Result;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    /// The log score separating the two populations
    pub threshold: f64,
    /// Whether each path scores at or above the threshold, in input order
    pub labels: Vec<bool>,
}

pub fn classify(paths: &[ViterbiPath]) -> Result<Classification> {
    if paths.is_empty() {
        return Err(InvalidInputError::EmptyBatch.into());
    }

    let per_state: Vec<f64> = paths.iter().map(|p| p.score_per_state()).collect();
    let avg_per_state = per_state
        .ordered_avg()
        .ok_or(InvalidInputError::EmptyBatch)?;

    let (below, rest): (Vec<(f64, f64)>, Vec<(f64, f64)>) = paths
        .iter()
        .zip(&per_state)
        .map(|(path, &score_per_state)| (path.score, score_per_state))
        .partition(|&(_, score_per_state)| score_per_state < avg_per_state);

    let bucket_mean = |bucket: Vec<(f64, f64)>| -> Option<f64> {
        bucket
            .into_iter()
            .map(|(score, _)| score)
            .collect::<Vec<f64>>()
            .ordered_avg()
    };

    let threshold = match (bucket_mean(below), bucket_mean(rest)) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(mean), None) | (None, Some(mean)) => mean,
        (None, None) => return Err(InvalidInputError::EmptyBatch.into()),
    };

    let labels = paths.iter().map(|p| p.score >= threshold).collect();

    Ok(Classification { threshold, labels })
}
