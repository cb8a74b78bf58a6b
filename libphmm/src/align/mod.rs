pub mod structs;

mod viterbi;
pub use viterbi::viterbi;

mod traceback;
pub use traceback::traceback;

mod parallel;
pub use parallel::{viterbi_parallel, BatchConfig, BatchConfigBuilder};
