//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project};
use crate::store::Store;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Open the store named by `--database`, the config, or the enclosing
/// `.autoparts/` directory, in that order.
pub fn open_store(global: &GlobalOpts) -> Result<Store> {
    let path = match &global.database {
        Some(path) => path.clone(),
        None => match Config::load().database {
            Some(path) => path,
            None => Project::discover()
                .map_err(|e| miette::miette!("{}", e))?
                .database_path(),
        },
    };
    tracing::debug!(path = %path.display(), "opening store");
    Ok(Store::open(&path)?)
}

/// Concrete format for a command: an explicit `-f` wins, then the
/// configured default, then `fallback`.
pub fn resolve_format(global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    Config::load()
        .default_format
        .and_then(|f| OutputFormat::from_str(&f, true).ok())
        .filter(|f| *f != OutputFormat::Auto)
        .unwrap_or(fallback)
}

/// Split `name=value` arguments
pub fn parse_pairs(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| miette::miette!("Expected name=value, got '{}'", arg))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("свечи зажигания", 8), "свечи...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs(&["name=Oil filter".to_string(), "price = 12,5".to_string()])
            .unwrap();
        assert_eq!(pairs[0], ("name".to_string(), "Oil filter".to_string()));
        assert_eq!(pairs[1], ("price".to_string(), " 12,5".to_string()));
        assert!(parse_pairs(&["oops".to_string()]).is_err());
        assert!(parse_pairs(&["=1".to_string()]).is_err());
    }

    #[test]
    fn test_explicit_format_wins() {
        let global = GlobalOpts {
            format: OutputFormat::Csv,
            quiet: false,
            verbose: 0,
            database: None,
        };
        assert_eq!(resolve_format(&global, OutputFormat::Tsv), OutputFormat::Csv);
    }
}
