use crate::alphabet::Alphabet;
use crate::diagnostics::Diagnostics;
use crate::structs::hmm::ProfileConfig;
use crate::structs::{Hmm, Sequence, State, NUM_STATES};
use crate::util::{LogAbuse, VecMath};

use std::fmt;
use std::fmt::Formatter;

use anyhow::Result;

/// The log-space form of a profile HMM used for decoding.
#[derive(Clone)]
pub struct Profile {
    /// The name of the profile
    pub name: String,
    /// Model length: the number of match columns plus the begin position
    pub length: usize,
    /// Transition scores, indexed [model position][from state][to state]
    pub transitions: Vec<[[f64; NUM_STATES]; NUM_STATES]>,
    /// Match scores, indexed [model position][digital residue]
    pub match_scores: Vec<Vec<f64>>,
    /// Insert scores, indexed [model position][digital residue]
    pub insert_scores: Vec<Vec<f64>>,
    /// The profile's consensus sequence, one residue per match column
    pub consensus_sequence: Vec<u8>,
    /// The sequence alphabet
    pub alphabet: Alphabet,
}

impl Profile {
    pub fn new(hmm: &Hmm) -> Self {
        let to_scores = |probabilities: &Vec<Vec<f64>>| -> Vec<Vec<f64>> {
            probabilities
                .iter()
                .map(|row| row.iter().map(|&p| p.ln_or_inf()).collect())
                .collect()
        };

        let transitions = hmm
            .model
            .transition_probabilities
            .iter()
            .map(|&position| position.map(|row| row.map(|p| p.ln_or_inf())))
            .collect();

        let consensus_sequence = hmm
            .model
            .match_probabilities
            .iter()
            .skip(1)
            .map(|probabilities| {
                // the consensus residue is the match emission with the highest probability
                let argmax = probabilities.argmax().unwrap_or(0);
                let residue = hmm.alphabet.symbol(argmax);

                if probabilities[argmax] > 0.5 {
                    residue.to_ascii_uppercase()
                } else {
                    residue.to_ascii_lowercase()
                }
            })
            .collect();

        Profile {
            name: hmm.header.name.clone(),
            length: hmm.header.model_length,
            transitions,
            match_scores: to_scores(&hmm.model.match_probabilities),
            insert_scores: to_scores(&hmm.model.insert_probabilities),
            consensus_sequence,
            alphabet: hmm.alphabet.clone(),
        }
    }

    /// Builds the probability model from an alignment and converts it to log space.
    pub fn from_alignment(
        sequences: &[Sequence],
        config: &ProfileConfig,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        let hmm = Hmm::from_alignment(sequences, config, diagnostics)?;
        Ok(Profile::new(&hmm))
    }

    #[inline(always)]
    pub fn match_score(&self, residue: usize, profile_idx: usize) -> f64 {
        self.match_scores[profile_idx][residue]
    }

    #[inline(always)]
    pub fn insert_score(&self, residue: usize, profile_idx: usize) -> f64 {
        self.insert_scores[profile_idx][residue]
    }

    /// The emission score of a state; a delete state emits nothing.
    #[inline(always)]
    pub fn emission_score(&self, state: State, residue: usize, profile_idx: usize) -> f64 {
        match state {
            State::Match => self.match_score(residue, profile_idx),
            State::Insert => self.insert_score(residue, profile_idx),
            State::Delete => 0.0,
        }
    }

    /// The score of moving from `from` at model position `profile_idx` into `to`.
    #[inline(always)]
    pub fn transition_score(&self, from: State, to: State, profile_idx: usize) -> f64 {
        self.transitions[profile_idx][from.index()][to.index()]
    }

    pub fn consensus(&self) -> String {
        String::from_utf8_lossy(&self.consensus_sequence).into_owned()
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "model: {}", self.name)?;
        writeln!(f, "model length: {}", self.length)?;

        for i in 0..self.length {
            writeln!(f, "{}", i)?;
            for &residue in self.alphabet.symbols() {
                write!(f, "    {}    ", residue as char)?;
            }
            writeln!(f)?;

            for _ in 0..self.alphabet.size() {
                write!(f, "  ------ ")?;
            }
            writeln!(f)?;

            for j in 0..self.alphabet.size() {
                write!(f, "{:8.4} ", self.match_scores[i][j])?;
            }
            writeln!(f)?;

            for j in 0..self.alphabet.size() {
                write!(f, "{:8.4} ", self.insert_scores[i][j])?;
            }
            writeln!(f)?;

            for from in State::ALL {
                for to in State::ALL {
                    write!(f, "{:8.4} ", self.transition_score(from, to, i))?;
                }
            }
            writeln!(f)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
