//! Loading of record populations and their companions.
//!
//! Parses JSON, JSONL and CSV files into in-memory record lists, discovers
//! data files under a directory, and draws random subsamples. The checking
//! core never touches raw file bytes; it goes through this crate.

mod discovery;
mod error;
mod loader;
mod sampling;

pub use discovery::{SUPPORTED_EXTENSIONS, discover_data_files};
pub use error::{IngestError, Result};
pub use loader::{load_records, load_rule_config, load_schema};
pub use sampling::{sample_records, sample_size};
