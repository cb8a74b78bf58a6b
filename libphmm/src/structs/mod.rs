pub mod hmm;
pub use hmm::{Hmm, ProfileConfig, ProfileConfigBuilder};

pub mod profile;
pub use profile::Profile;

pub mod sequence;
pub use sequence::Sequence;

pub mod state;
pub use state::{State, NUM_STATES};
