use std::fmt::{Display, Formatter};

use serde::Serialize;
use strum::{EnumCount, EnumIter};

/// The hidden states of a profile HMM position.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumIter, EnumCount,
)]
pub enum State {
    Match,
    Insert,
    Delete,
}

pub const NUM_STATES: usize = State::COUNT;

impl State {
    /// The states in the order they are evaluated; ties
    /// between predecessors are broken in this order.
    pub const ALL: [State; NUM_STATES] = [State::Match, State::Insert, State::Delete];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The number of (sequence positions, model positions) consumed by the state.
    #[inline(always)]
    pub fn shift(self) -> (usize, usize) {
        match self {
            State::Match => (1, 1),
            State::Insert => (1, 0),
            State::Delete => (0, 1),
        }
    }

    #[inline(always)]
    pub fn emits(self) -> bool {
        !matches!(self, State::Delete)
    }

    pub fn to_char(self) -> char {
        match self {
            State::Match => 'M',
            State::Insert => 'I',
            State::Delete => 'D',
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
