use crate::error::OutOfMemoryError;
use crate::structs::{State, NUM_STATES};

use anyhow::Result;

/// The Viterbi DP matrices: the best score of every (state, target
/// position, profile position) cell and the predecessor state that produced it.
#[derive(Default, Clone)]
pub struct ViterbiMatrix {
    pub target_length: usize,
    pub profile_length: usize,
    /// The score cells as a flat vector.
    //
    // the data is stored in the following pattern:
    //     [
    //
    //         m_(0, 0), i_(0, 0), d_(0, 0),
    //         m_(0, 1), i_(0, 1), d_(0, 1),
    //         ...
    //         m_(0, P), i_(0, P), d_(0, P),
    //         ...
    //         m_(T, 0), i_(T, 0), d_(T, 0),
    //         ...
    //         m_(T, P), i_(T, P), d_(T, P)
    //
    //     ]
    //
    // where:
    //
    //     T:        <target_length>
    //     P:        <profile_length> - 1
    //     m_(i, j): the match score at cell (i, j)
    //     i_(i, j): the insert score at cell (i, j)
    //     d_(i, j): the delete score at cell (i, j)
    //
    scores: Vec<f64>,
    /// The predecessor states, laid out like the scores.
    /// A cell that can't be reached has no predecessor.
    args: Vec<Option<State>>,
}

impl ViterbiMatrix {
    /// Allocates the matrices for a target of `target_length` residues
    /// against a profile with `profile_length` positions.
    ///
    /// Every cell starts at -inf with no predecessor.
    pub fn new(name: &str, target_length: usize, profile_length: usize) -> Result<Self> {
        let out_of_memory = |bytes: usize| OutOfMemoryError {
            name: name.to_string(),
            bytes,
        };

        let num_cells = (target_length + 1)
            .checked_mul(profile_length)
            .and_then(|cells| cells.checked_mul(NUM_STATES))
            .ok_or_else(|| out_of_memory(usize::MAX))?;

        let bytes = num_cells
            .checked_mul(std::mem::size_of::<f64>() + std::mem::size_of::<Option<State>>())
            .ok_or_else(|| out_of_memory(usize::MAX))?;

        let mut scores: Vec<f64> = vec![];
        scores
            .try_reserve_exact(num_cells)
            .map_err(|_| out_of_memory(bytes))?;
        scores.resize(num_cells, -f64::INFINITY);

        let mut args: Vec<Option<State>> = vec![];
        args.try_reserve_exact(num_cells)
            .map_err(|_| out_of_memory(bytes))?;
        args.resize(num_cells, None);

        Ok(Self {
            target_length,
            profile_length,
            scores,
            args,
        })
    }

    #[inline(always)]
    fn cell_idx(&self, state: State, target_idx: usize, profile_idx: usize) -> usize {
        debug_assert!(target_idx <= self.target_length);
        debug_assert!(profile_idx < self.profile_length);
        (target_idx * self.profile_length + profile_idx) * NUM_STATES + state.index()
    }

    #[inline(always)]
    pub fn get_score(&self, state: State, target_idx: usize, profile_idx: usize) -> f64 {
        self.scores[self.cell_idx(state, target_idx, profile_idx)]
    }

    #[inline(always)]
    pub fn get_arg(&self, state: State, target_idx: usize, profile_idx: usize) -> Option<State> {
        self.args[self.cell_idx(state, target_idx, profile_idx)]
    }

    #[inline(always)]
    pub fn set(
        &mut self,
        state: State,
        target_idx: usize,
        profile_idx: usize,
        score: f64,
        arg: Option<State>,
    ) {
        let idx = self.cell_idx(state, target_idx, profile_idx);
        self.scores[idx] = score;
        self.args[idx] = arg;
    }

    pub fn num_cells(&self) -> usize {
        self.scores.len()
    }
}
