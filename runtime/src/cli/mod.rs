//! CLI argument resolution and subcommand implementations for the foldscan binary.

pub mod args;
pub mod output;
pub mod scan_cmd;
