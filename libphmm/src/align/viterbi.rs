use std::time::Instant;

use crate::align::structs::{ViterbiMatrix, ViterbiPath};
use crate::align::traceback;
use crate::diagnostics::Diagnostics;
use crate::structs::{Profile, Sequence, State};

use anyhow::Result;

/// Fills the Viterbi matrices for a digitized target.
///
/// `target` is buffered with one byte so that position 1 is at index 1.
pub(crate) fn viterbi_fill(profile: &Profile, target: &[u8], matrix: &mut ViterbiMatrix) {
    let target_length = target.len() - 1;

    // every path starts in the begin position, before any residue
    matrix.set(State::Match, 0, 0, 0.0, None);

    for target_idx in 0..=target_length {
        for profile_idx in 0..profile.length {
            if target_idx == 0 && profile_idx == 0 {
                continue;
            }

            // states are computed fresh at each cell so that a delete
            // is always read after the delete before it in the same row
            for state in State::ALL {
                let (target_shift, profile_shift) = state.shift();
                if target_idx < target_shift || profile_idx < profile_shift {
                    continue;
                }
                let prev_target_idx = target_idx - target_shift;
                let prev_profile_idx = profile_idx - profile_shift;

                let mut max_score = -f64::INFINITY;
                let mut max_state: Option<State> = None;

                for prev_state in State::ALL {
                    let score = matrix.get_score(prev_state, prev_target_idx, prev_profile_idx)
                        + profile.transition_score(prev_state, state, prev_profile_idx);

                    // ties keep the first state in M, I, D order
                    if score > max_score {
                        max_score = score;
                        max_state = Some(prev_state);
                    }
                }

                if max_state.is_none() {
                    continue;
                }

                let emission_score = if state.emits() {
                    profile.emission_score(state, target[target_idx] as usize, profile_idx)
                } else {
                    0.0
                };

                matrix.set(
                    state,
                    target_idx,
                    profile_idx,
                    max_score + emission_score,
                    max_state,
                );
            }
        }
    }
}

/// Computes the most likely state path of `target` under `profile`.
pub fn viterbi(
    profile: &Profile,
    target: &Sequence,
    diagnostics: &dyn Diagnostics,
) -> Result<ViterbiPath> {
    let now = Instant::now();
    let digital_target = profile.alphabet.digitize(target)?;

    let mut matrix = ViterbiMatrix::new(&target.name, target.length, profile.length)?;
    viterbi_fill(profile, &digital_target, &mut matrix);

    let path = traceback(profile, target, &matrix)?;

    diagnostics.debug(format_args!(
        "decoded {} in {:.6}s: score {:.4}, path {}",
        path.name,
        now.elapsed().as_secs_f64(),
        path.score,
        path.state_string()
    ));

    Ok(path)
}
