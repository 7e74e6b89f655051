//! CLI command implementations.

pub mod common;
pub mod oracle;
pub mod show_config;
pub mod solve;
pub mod truth_table;
pub mod version;
