//! Logging setup and status reporting for headless runs.

mod output;

pub use output::{setup_output, write_status_table, StatusReport};
