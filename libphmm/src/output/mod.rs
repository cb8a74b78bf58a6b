mod output_tabular;
pub use output_tabular::{write_tabular_output, Field, TableFormat};
