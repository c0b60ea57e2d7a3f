//! Output module for extraction results
//!
//! This module handles:
//! - Turning the summarized hierarchy into module records
//! - Rendering records as JSON
//! - Recording and printing run statistics

mod records;
pub mod stats;

pub use records::{build_records, to_json, write_json, ModuleRecord};
pub use stats::{format_statistics, print_statistics, RunStats};
