use crate::alphabet::Alphabet;
use crate::diagnostics::Diagnostics;
use crate::error::InvalidInputError;
use crate::structs::{Sequence, State, NUM_STATES};
use crate::util::VecMath;

use anyhow::Result;
use derive_builder::Builder;

/// Parameters of model construction.
#[derive(Builder, Clone, Debug)]
#[builder(default)]
pub struct ProfileConfig {
    /// The name given to the model
    pub name: String,
    /// Added to every emission count before normalizing
    pub pseudocount_emission: u32,
    /// Added to every transition count before normalizing
    pub pseudocount_transition: u32,
    /// The fraction of non-gap residues a column
    /// needs to be considered a match column
    pub match_column_threshold: f64,
    /// The residues and gap symbol of the training alignment
    pub alphabet: Alphabet,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "phmm".to_string(),
            pseudocount_emission: 1,
            pseudocount_transition: 1,
            match_column_threshold: 0.5,
            alphabet: Alphabet::default(),
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.match_column_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(InvalidInputError::InvalidConfig(format!(
                "match column threshold must be in (0, 1], got {threshold}"
            ))
            .into());
        }
        Ok(())
    }

    /// The largest number of gaps a column may contain
    /// and still be considered a match column.
    pub fn max_match_column_gaps(&self, num_sequences: usize) -> usize {
        let limit = num_sequences as f64 * (1.0 - self.match_column_threshold);
        if limit <= 0.0 {
            return 0;
        }

        // round to 9 significant digits so that the representation
        // error of (1 - threshold) can't push the limit up by one
        let scale = 10f64.powi(8 - limit.log10().floor() as i32);
        ((limit * scale).round() / scale).ceil() as usize
    }
}

/// Represents the header of the model.
#[derive(Default, Clone, Debug)]
pub struct Header {
    pub name: String,
    /// The number of match columns plus one for the begin position
    pub model_length: usize,
    /// The number of columns in the training alignment
    pub alignment_width: usize,
    pub num_sequences: usize,
}

/// The probability-space model.
#[derive(Default, Clone, Debug)]
pub struct Model {
    /// Indexed [model position][digital residue]
    pub match_probabilities: Vec<Vec<f64>>,
    /// Indexed [model position][digital residue]
    pub insert_probabilities: Vec<Vec<f64>>,
    /// Indexed [model position of the source state][from state][to state]
    pub transition_probabilities: Vec<[[f64; NUM_STATES]; NUM_STATES]>,
    /// Whether each alignment column is a match column
    pub match_columns: Vec<bool>,
}

/// A profile HMM estimated from a multiple sequence alignment.
#[derive(Default, Clone, Debug)]
pub struct Hmm {
    pub header: Header,
    pub model: Model,
    pub alphabet: Alphabet,
}

impl Hmm {
    /// Estimates the emission and transition probabilities of a
    /// profile HMM from the rows of a multiple sequence alignment.
    pub fn from_alignment(
        sequences: &[Sequence],
        config: &ProfileConfig,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        config.validate()?;

        let first = sequences.first().ok_or(InvalidInputError::EmptyTrainingSet)?;
        let width = first.length;

        if let Some(ragged) = sequences.iter().find(|seq| seq.length != width) {
            return Err(InvalidInputError::LengthMismatch {
                name: ragged.name.clone(),
                expected: width,
                found: ragged.length,
            }
            .into());
        }

        let alphabet = &config.alphabet;
        let alignment = digitize_alignment(sequences, alphabet)?;

        // COLUMN COUNTS

        let mut gap_counts = vec![0usize; width];
        let mut residue_counts = vec![vec![0usize; alphabet.size()]; width];

        alignment.iter().for_each(|row| {
            row.iter().enumerate().for_each(|(col, residue)| match residue {
                Some(digital) => residue_counts[col][*digital] += 1,
                None => gap_counts[col] += 1,
            })
        });

        // COLUMN ROLES

        let max_gaps = config.max_match_column_gaps(sequences.len());
        let match_columns: Vec<bool> = gap_counts.iter().map(|&gaps| gaps <= max_gaps).collect();

        let num_match_columns = match_columns.iter().filter(|&&is_match| is_match).count();
        if num_match_columns == 0 {
            return Err(InvalidInputError::NoMatchColumns.into());
        }
        let model_length = num_match_columns + 1;

        // the model position of every column: a match column's own position,
        // or the position of the preceding match column for an insert column
        let mut column_positions = vec![0usize; width];
        let mut position = 0usize;
        for col in 0..width {
            if match_columns[col] {
                position += 1;
            }
            column_positions[col] = position;
        }

        diagnostics.debug(format_args!(
            "insert columns: {:?}",
            (0..width).filter(|&col| !match_columns[col]).collect::<Vec<_>>()
        ));

        // EMISSIONS

        let mut match_counts = vec![vec![0.0f64; alphabet.size()]; model_length];
        let mut insert_counts = vec![vec![0.0f64; alphabet.size()]; model_length];

        for col in 0..width {
            let counts = if match_columns[col] {
                &mut match_counts[column_positions[col]]
            } else {
                &mut insert_counts[column_positions[col]]
            };

            counts
                .iter_mut()
                .zip(&residue_counts[col])
                .for_each(|(total, &count)| *total += count as f64);
        }

        let pseudocount_emission = config.pseudocount_emission as f64;
        let to_probabilities = |counts: Vec<f64>| {
            let mut probabilities: Vec<f64> = counts
                .into_iter()
                .map(|count| count + pseudocount_emission)
                .collect();
            probabilities.normalize();
            probabilities
        };

        let mut match_probabilities: Vec<Vec<f64>> =
            match_counts.into_iter().map(to_probabilities).collect();
        // the begin position never emits
        match_probabilities[0] = vec![1.0 / alphabet.size() as f64; alphabet.size()];

        let insert_probabilities: Vec<Vec<f64>> =
            insert_counts.into_iter().map(to_probabilities).collect();

        // TRANSITIONS

        let mut transition_counts = vec![[[0.0f64; NUM_STATES]; NUM_STATES]; model_length];

        for row in &alignment {
            let mut from = State::Match;
            let mut position = 0usize;

            for (col, residue) in row.iter().enumerate() {
                let to = match (match_columns[col], residue) {
                    (true, Some(_)) => State::Match,
                    (true, None) => State::Delete,
                    (false, Some(_)) => State::Insert,
                    (false, None) => continue,
                };

                transition_counts[position][from.index()][to.index()] += 1.0;

                if to != State::Insert {
                    position += 1;
                }
                from = to;
            }

            // the transition into the end state
            transition_counts[position][from.index()][State::Match.index()] += 1.0;
        }

        let pseudocount_transition = config.pseudocount_transition as f64;
        let transition_probabilities: Vec<[[f64; NUM_STATES]; NUM_STATES]> = transition_counts
            .iter()
            .map(|position_counts| {
                let mut position_probabilities = [[0.0f64; NUM_STATES]; NUM_STATES];
                for (from, counts) in position_counts.iter().enumerate() {
                    let mut probabilities: Vec<f64> = counts
                        .iter()
                        .map(|count| count + pseudocount_transition)
                        .collect();
                    probabilities.normalize();
                    position_probabilities[from].copy_from_slice(&probabilities);
                }
                position_probabilities
            })
            .collect();

        diagnostics.info(format_args!(
            "built model {} of length {} from {} sequences of width {}",
            config.name,
            model_length,
            sequences.len(),
            width
        ));

        Ok(Hmm {
            header: Header {
                name: config.name.clone(),
                model_length,
                alignment_width: width,
                num_sequences: sequences.len(),
            },
            model: Model {
                match_probabilities,
                insert_probabilities,
                transition_probabilities,
                match_columns,
            },
            alphabet: alphabet.clone(),
        })
    }

    /// The number of match columns plus one for the begin position.
    pub fn length(&self) -> usize {
        self.header.model_length
    }
}

/// Maps every aligned residue to its digital value, or None for a gap.
fn digitize_alignment(
    sequences: &[Sequence],
    alphabet: &Alphabet,
) -> Result<Vec<Vec<Option<usize>>>> {
    sequences
        .iter()
        .map(|seq| {
            seq.residues()
                .iter()
                .enumerate()
                .map(|(idx, &byte)| -> Result<Option<usize>> {
                    if alphabet.is_gap(byte) {
                        return Ok(None);
                    }
                    match alphabet.digital(byte) {
                        Some(digital) => Ok(Some(digital)),
                        None => Err(InvalidInputError::UnknownSymbol {
                            name: seq.name.clone(),
                            position: idx + 1,
                            symbol: byte as char,
                        }
                        .into()),
                    }
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testing::RecordingDiagnostics;
    use crate::diagnostics::NoDiagnostics;
    use crate::test_data::{sequences, training_alignment};
    use assert2::{check, let_assert};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn build_error(seqs: &[Sequence], config: &ProfileConfig) -> InvalidInputError {
        let result = Hmm::from_alignment(seqs, config, &NoDiagnostics);
        let_assert!(Err(err) = result);
        let_assert!(Some(invalid) = err.downcast_ref::<InvalidInputError>());
        invalid.clone()
    }

    #[test]
    fn test_config_builder() -> anyhow::Result<()> {
        let config = ProfileConfigBuilder::default()
            .pseudocount_emission(3)
            .match_column_threshold(0.7)
            .build()?;

        check!(config.pseudocount_emission == 3);
        check!(config.pseudocount_transition == 1);
        check!(config.match_column_threshold == 0.7);
        check!(config.alphabet == Alphabet::rna());
        check!(config.max_match_column_gaps(10) == 3);
        check!(ProfileConfig::default().max_match_column_gaps(10) == 5);
        check!(ProfileConfig::default().max_match_column_gaps(7) == 4);
        Ok(())
    }

    #[test]
    fn test_match_column_gap_limit() -> anyhow::Result<()> {
        let config = |threshold: f64| {
            ProfileConfigBuilder::default()
                .match_column_threshold(threshold)
                .build()
        };

        // 10 * (1 - 0.7) is slightly above 3 in floating point
        check!(config(0.7)?.max_match_column_gaps(10) == 3);
        check!(config(0.9)?.max_match_column_gaps(20) == 2);
        check!(config(0.75)?.max_match_column_gaps(10) == 3);

        // a tiny positive limit still allows one gap
        check!(config(1.0 - 1e-12)?.max_match_column_gaps(3) == 1);
        check!(config(1.0)?.max_match_column_gaps(3) == 0);
        check!(config(0.5)?.max_match_column_gaps(0) == 0);
        Ok(())
    }

    #[test]
    fn test_column_roles() -> anyhow::Result<()> {
        let diagnostics = RecordingDiagnostics::default();
        let hmm = Hmm::from_alignment(&training_alignment(), &ProfileConfig::default(), &diagnostics)?;

        let insert_columns: Vec<usize> = (0..hmm.header.alignment_width)
            .filter(|&col| !hmm.model.match_columns[col])
            .collect();

        check!(insert_columns == vec![1, 2]);
        check!(hmm.length() == 10);
        check!(hmm.header.num_sequences == 10);
        check!(hmm.header.alignment_width == 11);
        check!(hmm.model.match_probabilities.len() == 10);
        check!(hmm.model.insert_probabilities.len() == 10);
        check!(hmm.model.transition_probabilities.len() == 10);

        check!(*diagnostics.debug.lock().unwrap() == vec!["insert columns: [1, 2]"]);
        check!(diagnostics.info.lock().unwrap().len() == 1);
        Ok(())
    }

    #[test]
    fn test_emission_probabilities() -> anyhow::Result<()> {
        let hmm = Hmm::from_alignment(&training_alignment(), &ProfileConfig::default(), &NoDiagnostics)?;
        let alphabet = Alphabet::rna();
        let (a, c, g, u) = (0, 1, 2, 3);
        check!(alphabet.digital(b'U') == Some(u));

        // every match column is fully conserved
        check!(approx(hmm.model.match_probabilities[1][u], 11.0 / 14.0));
        check!(approx(hmm.model.match_probabilities[1][a], 1.0 / 14.0));
        check!(approx(hmm.model.match_probabilities[5][c], 11.0 / 14.0));
        check!(approx(hmm.model.match_probabilities[9][g], 11.0 / 14.0));

        // the begin position is uniform
        check!(hmm.model.match_probabilities[0] == vec![0.25; 4]);

        // both insert columns pool into the insert emissions of position 1
        check!(approx(hmm.model.insert_probabilities[1][a], 5.0 / 12.0));
        check!(approx(hmm.model.insert_probabilities[1][c], 5.0 / 12.0));
        check!(approx(hmm.model.insert_probabilities[1][g], 1.0 / 12.0));
        check!(approx(hmm.model.insert_probabilities[1][u], 1.0 / 12.0));

        // positions without observed inserts receive the pseudocounts only
        check!(hmm.model.insert_probabilities[0] == vec![0.25; 4]);
        check!(hmm.model.insert_probabilities[5] == vec![0.25; 4]);
        Ok(())
    }

    #[test]
    fn test_transition_probabilities() -> anyhow::Result<()> {
        let hmm = Hmm::from_alignment(&training_alignment(), &ProfileConfig::default(), &NoDiagnostics)?;
        let t = &hmm.model.transition_probabilities;
        let (m, i, d) = (
            State::Match.index(),
            State::Insert.index(),
            State::Delete.index(),
        );

        check!(approx(t[0][m][m], 11.0 / 13.0));
        check!(approx(t[0][m][i], 1.0 / 13.0));
        check!(approx(t[1][m][m], 6.0 / 13.0));
        check!(approx(t[1][m][i], 6.0 / 13.0));
        check!(approx(t[1][m][d], 1.0 / 13.0));
        check!(approx(t[1][i][i], 4.0 / 11.0));
        check!(approx(t[1][i][m], 6.0 / 11.0));
        check!(approx(t[1][i][d], 1.0 / 11.0));
        // the end transitions are counted as match to match at the last position
        check!(approx(t[9][m][m], 11.0 / 13.0));
        // nothing ever leaves a delete state
        check!(approx(t[5][d][d], 1.0 / 3.0));
        Ok(())
    }

    #[test]
    fn test_probabilities_sum_to_one() -> anyhow::Result<()> {
        let seqs = sequences(&["ACG-U", "A-GCU", "ACGGU", "--G-U", "AAG-A"]);
        for pseudocount in [0, 1, 4] {
            let config = ProfileConfigBuilder::default()
                .pseudocount_emission(pseudocount)
                .pseudocount_transition(pseudocount)
                .build()?;
            let hmm = Hmm::from_alignment(&seqs, &config, &NoDiagnostics)?;

            for row in hmm
                .model
                .match_probabilities
                .iter()
                .chain(hmm.model.insert_probabilities.iter())
            {
                check!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }

            for position in &hmm.model.transition_probabilities {
                for row in position {
                    check!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_pseudocounts_smooth_toward_uniform() -> anyhow::Result<()> {
        let seqs = sequences(&["ACG-U", "A-GCU", "ACGGU", "--G-U", "AAG-A"]);
        let small = Hmm::from_alignment(
            &seqs,
            &ProfileConfigBuilder::default().pseudocount_emission(1).build()?,
            &NoDiagnostics,
        )?;
        let large = Hmm::from_alignment(
            &seqs,
            &ProfileConfigBuilder::default().pseudocount_emission(5).build()?,
            &NoDiagnostics,
        )?;

        let pairs = small
            .model
            .match_probabilities
            .iter()
            .zip(&large.model.match_probabilities)
            .chain(
                small
                    .model
                    .insert_probabilities
                    .iter()
                    .zip(&large.model.insert_probabilities),
            );

        let mut compared = 0;
        for (small_row, large_row) in pairs {
            for (&p_small, &p_large) in small_row.iter().zip(large_row) {
                if (p_small - 0.25).abs() > 1e-12 {
                    check!((p_large - 0.25).abs() < (p_small - 0.25).abs());
                    compared += 1;
                }
            }
        }
        check!(compared > 0);
        Ok(())
    }

    #[test]
    fn test_zero_pseudocounts_fall_back_to_uniform() -> anyhow::Result<()> {
        let config = ProfileConfigBuilder::default()
            .pseudocount_emission(0)
            .pseudocount_transition(0)
            .build()?;
        let hmm = Hmm::from_alignment(&sequences(&["AC", "AC"]), &config, &NoDiagnostics)?;

        check!(hmm.model.match_probabilities[1] == vec![1.0, 0.0, 0.0, 0.0]);
        check!(hmm.model.insert_probabilities[1] == vec![0.25; 4]);
        check!(hmm.model.transition_probabilities[1][State::Delete.index()] == [1.0 / 3.0; 3]);
        check!(hmm.model.transition_probabilities[1][State::Match.index()] == [1.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_invalid_training_sets() -> anyhow::Result<()> {
        let config = ProfileConfig::default();

        check!(build_error(&[], &config) == InvalidInputError::EmptyTrainingSet);

        check!(
            build_error(&sequences(&["ACGU", "ACG"]), &config)
                == InvalidInputError::LengthMismatch {
                    name: "seq-1".to_string(),
                    expected: 4,
                    found: 3,
                }
        );

        check!(
            build_error(&sequences(&["ACGU", "AC-T"]), &config)
                == InvalidInputError::UnknownSymbol {
                    name: "seq-1".to_string(),
                    position: 4,
                    symbol: 'T',
                }
        );

        let strict = ProfileConfigBuilder::default()
            .match_column_threshold(1.0)
            .build()?;
        check!(build_error(&sequences(&["A-", "-C"]), &strict) == InvalidInputError::NoMatchColumns);

        for threshold in [0.0, -0.5, 1.5, f64::NAN] {
            let config = ProfileConfigBuilder::default()
                .match_column_threshold(threshold)
                .build()?;
            let_assert!(InvalidInputError::InvalidConfig(_) = build_error(&sequences(&["A"]), &config));
        }
        Ok(())
    }

    #[test]
    fn test_custom_alphabet() -> anyhow::Result<()> {
        let config = ProfileConfigBuilder::default()
            .alphabet(Alphabet::new(b"ACGT", b'.')?)
            .build()?;
        let hmm = Hmm::from_alignment(&sequences(&["AC.T", "ACGT", "A..T", "AC.T"]), &config, &NoDiagnostics)?;

        check!(hmm.model.match_columns == vec![true, true, false, true]);
        check!(hmm.length() == 4);
        check!(hmm.alphabet == config.alphabet);
        Ok(())
    }
}
