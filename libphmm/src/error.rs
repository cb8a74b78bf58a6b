use thiserror::Error;

/// Errors caused by the data handed to the library: the training
/// alignment, a test sequence, the configuration or the model itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("no training sequences were provided")]
    EmptyTrainingSet,
    #[error("sequence {name} has length {found}, expected alignment length {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("sequence {name} has unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol {
        name: String,
        position: usize,
        symbol: char,
    },
    #[error("no alignment column qualifies as a match column")]
    NoMatchColumns,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("sequence {name} has no path with non-zero probability under the model")]
    NoViablePath { name: String },
    #[error("no decoded paths were provided")]
    EmptyBatch,
}

/// The DP matrices for a sequence could not be allocated.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("out of memory: failed to allocate {bytes} bytes of DP matrix for sequence {name}")]
pub struct OutOfMemoryError {
    pub name: String,
    pub bytes: usize,
}
