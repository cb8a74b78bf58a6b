use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};
use libphmm::alphabet::{Alphabet, RNA_ALPHABET, UTF8_DASH};
use libphmm::structs::{ProfileConfig, ProfileConfigBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("gap symbol must be a single ASCII character, got '{0}'")]
pub struct NonAsciiGapError(char);

#[derive(Parser, Debug)]
#[command(name = "phmm")]
#[command(
    about = "Train a profile HMM from an aligned FASTA file and classify sequences by their Viterbi score"
)]
pub struct Cli {
    /// Aligned training sequences
    #[arg(value_name = "TRAIN.fasta")]
    pub train_path: PathBuf,

    /// Unaligned sequences to decode and classify
    #[arg(value_name = "TEST.fasta")]
    pub test_path: PathBuf,

    /// Arguments that control model construction
    #[command(flatten)]
    pub model_args: ModelArgs,

    /// Arguments that control output options
    #[command(flatten)]
    pub output_args: OutputArgs,

    /// Arguments that are common across all of phmm
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// The pseudocount added to every emission count
    #[arg(long = "pseudocount-emission", default_value_t = 1u32, value_name = "N")]
    pub pseudocount_emission: u32,

    /// The pseudocount added to every transition count
    #[arg(long = "pseudocount-transition", default_value_t = 1u32, value_name = "N")]
    pub pseudocount_transition: u32,

    /// The fraction of non-gap residues a column needs to be a match column
    #[arg(long = "match-threshold", default_value_t = 0.5f64, value_name = "F")]
    pub match_threshold: f64,

    /// The residue symbols of the alignment
    #[arg(
        long = "alphabet",
        default_value_t = String::from_utf8_lossy(&RNA_ALPHABET).to_string(),
        value_name = "SYMBOLS"
    )]
    pub alphabet: String,

    /// The gap symbol of the alignment
    #[arg(long = "gap", default_value_t = UTF8_DASH as char, value_name = "C")]
    pub gap: char,
}

impl ModelArgs {
    pub fn profile_config(&self, name: &str) -> Result<ProfileConfig> {
        if !self.gap.is_ascii() {
            return Err(NonAsciiGapError(self.gap).into());
        }

        let alphabet = Alphabet::new(self.alphabet.as_bytes(), self.gap as u8)?;

        let config = ProfileConfigBuilder::default()
            .name(name.to_string())
            .pseudocount_emission(self.pseudocount_emission)
            .pseudocount_transition(self.pseudocount_transition)
            .match_column_threshold(self.match_threshold)
            .alphabet(alphabet)
            .build()?;

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Where to place tabular output [default: stdout]
    #[arg(short = 'T', long = "tab-output", value_name = "path")]
    pub tbl_results_path: Option<PathBuf>,

    /// Where to place JSON output
    #[arg(short = 'J', long = "json-output", value_name = "path")]
    pub json_results_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The number of threads that phmm will use [default: all available]
    #[arg(short = 't', long = "threads", value_name = "n")]
    pub num_threads: Option<usize>,

    /// Allow phmm to overwrite files
    #[arg(long = "allow-overwrite", default_value_t = false)]
    pub allow_overwrite: bool,
}
