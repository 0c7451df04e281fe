//! Mapping file output (JSON + CSV)

pub mod writer;

pub use writer::{rows_to_csv, write_outputs, OutputPaths, CSV_FILE_NAME, JSON_FILE_NAME};
