use crate::align::structs::{ViterbiMatrix, ViterbiPath};
use crate::error::InvalidInputError;
use crate::structs::{Profile, Sequence, State};

use anyhow::Result;

/// Recovers the best state path from filled Viterbi matrices.
///
/// The path ends with an implicit match into the end state
/// at the last profile position, which is included in the score.
pub fn traceback(profile: &Profile, target: &Sequence, matrix: &ViterbiMatrix) -> Result<ViterbiPath> {
    let no_viable_path = || InvalidInputError::NoViablePath {
        name: target.name.clone(),
    };

    let mut target_idx = target.length;
    let mut profile_idx = profile.length - 1;

    let mut max_score = -f64::INFINITY;
    let mut end_state: Option<State> = None;

    for state in State::ALL {
        let score = matrix.get_score(state, target_idx, profile_idx)
            + profile.transition_score(state, State::Match, profile_idx);

        if score > max_score {
            max_score = score;
            end_state = Some(state);
        }
    }

    let mut state = end_state.ok_or_else(no_viable_path)?;
    let mut states: Vec<State> = Vec::with_capacity(target.length + profile.length);

    while !(target_idx == 0 && profile_idx == 0) {
        states.push(state);

        let prev_state = matrix
            .get_arg(state, target_idx, profile_idx)
            .ok_or_else(no_viable_path)?;

        let (target_shift, profile_shift) = state.shift();
        target_idx -= target_shift;
        profile_idx -= profile_shift;
        state = prev_state;
    }

    states.reverse();

    Ok(ViterbiPath {
        name: target.name.clone(),
        description: target.details.clone(),
        score: max_score,
        states,
    })
}
