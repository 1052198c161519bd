//! Output module for reporting mirror runs

mod summary;

pub use summary::{print_summary, RunSummary};
