use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::align::structs::ViterbiPath;
use crate::align::viterbi;
use crate::diagnostics::Diagnostics;
use crate::error::InvalidInputError;
use crate::structs::{Profile, Sequence};

use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;

/// Parameters of a batch decode.
#[derive(Builder, Clone, Debug, Default)]
#[builder(setter(strip_option), default)]
pub struct BatchConfig {
    /// The number of worker threads; defaults to the available parallelism
    pub worker_count: Option<usize>,
}

impl BatchConfig {
    /// The number of workers used for a batch of `num_sequences`.
    pub fn num_workers(&self, num_sequences: usize) -> Result<usize> {
        let configured = match self.worker_count {
            Some(0) => {
                return Err(InvalidInputError::InvalidConfig(
                    "worker count must be at least 1".to_string(),
                )
                .into())
            }
            Some(count) => count,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        Ok(configured.min(num_sequences).max(1))
    }
}

/// Decodes every sequence against the profile on a dedicated pool of workers.
///
/// The paths are returned in the order of `sequences`. If any decode
/// fails, the batch stops and the first recorded error is returned.
pub fn viterbi_parallel(
    profile: &Profile,
    sequences: &[Sequence],
    config: &BatchConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<ViterbiPath>> {
    let num_workers = config.num_workers(sequences.len())?;

    if sequences.is_empty() {
        return Ok(vec![]);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .context("failed to build decoding thread pool")?;

    diagnostics.info(format_args!(
        "decoding {} sequences with {} workers",
        sequences.len(),
        num_workers
    ));

    let next_idx = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);
    let results: Vec<OnceLock<ViterbiPath>> = (0..sequences.len()).map(|_| OnceLock::new()).collect();

    pool.scope(|scope| {
        for worker_idx in 0..num_workers {
            let next_idx = &next_idx;
            let abort = &abort;
            let first_error = &first_error;
            let results = &results;

            scope.spawn(move |_| {
                let mut num_decoded = 0usize;

                while !abort.load(Ordering::Acquire) {
                    // claiming an index is a single atomic step
                    let seq_idx = next_idx.fetch_add(1, Ordering::Relaxed);
                    if seq_idx >= sequences.len() {
                        break;
                    }

                    match viterbi(profile, &sequences[seq_idx], diagnostics) {
                        Ok(path) => {
                            // each index is claimed once, so the slot is empty
                            let _ = results[seq_idx].set(path);
                            num_decoded += 1;
                        }
                        Err(err) => {
                            abort.store(true, Ordering::Release);
                            match first_error.lock() {
                                Ok(mut guard) => {
                                    if guard.is_none() {
                                        *guard = Some(err);
                                    }
                                }
                                Err(_) => panic!("batch error mutex was poisoned"),
                            }
                            break;
                        }
                    }
                }

                diagnostics.debug(format_args!(
                    "worker {worker_idx} decoded {num_decoded} sequences"
                ));
            });
        }
    });

    let first_error = match first_error.into_inner() {
        Ok(error) => error,
        Err(_) => panic!("batch error mutex was poisoned"),
    };

    if let Some(err) = first_error {
        return Err(err);
    }

    results
        .into_iter()
        .zip(sequences)
        .map(|(slot, seq)| {
            slot.into_inner()
                .ok_or_else(|| anyhow!("sequence {} was never decoded", seq.name))
        })
        .collect()
}
