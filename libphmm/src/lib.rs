pub mod align;
pub mod alphabet;
pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod structs;
pub mod util;

#[cfg(test)]
pub(crate) mod test_data;
