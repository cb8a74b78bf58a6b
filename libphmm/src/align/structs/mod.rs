mod path;
pub use path::ViterbiPath;

mod viterbi_matrix;
pub use viterbi_matrix::ViterbiMatrix;
