//! CLI command implementations

pub mod completions;
pub mod config;
pub mod import;
pub mod init;
pub mod report;
pub mod status;
pub mod table;
pub mod tables;
