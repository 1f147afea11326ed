//! `autoparts config` command - Configuration management
//!
//! Provides commands to view and modify the layered configuration.

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (see `autoparts config keys`)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of the store config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of the store config
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("database", "Database file used instead of .autoparts/store.db"),
    (
        "default_format",
        "Default output format (tsv, csv, md, json, id)",
    ),
    ("confirm_delete", "Ask before deleting records (true/false)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        match get_config_value(&config, key) {
            Some(v) => println!("{}", v),
            None => return Err(miette::miette!("Key '{}' is not set", key)),
        }
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).into_diagnostic()?
        );
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key).as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. --database option");
    println!("  2. Environment variables (AUTOPARTS_DATABASE, AUTOPARTS_FORMAT)");
    println!("  3. Store config (.autoparts/config.yaml)");
    println!("  4. Global config (~/.config/autoparts/config.yaml)");
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    check_key(&args.key)?;
    let value = parse_config_value(&args.key, &args.value)?;

    let config_path = config_path(args.global)?;
    let mut config_map = read_mapping(&config_path)?;
    if let serde_yml::Value::Mapping(map) = &mut config_map {
        map.insert(serde_yml::Value::String(args.key.clone()), value);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    if !global.quiet {
        let scope = if args.global { "global" } else { "store" };
        println!(
            "{} Set {} {} {} in {} config",
            style("✓").green(),
            style(&args.key).cyan(),
            style("→").dim(),
            style(&args.value).yellow(),
            scope
        );
    }
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let config_path = config_path(args.global)?;
    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = match &mut config_map {
        serde_yml::Value::Mapping(map) => map
            .remove(&serde_yml::Value::String(args.key.clone()))
            .is_some(),
        _ => false,
    };
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    if !global.quiet {
        let scope = if args.global { "global" } else { "store" };
        println!(
            "{} Removed {} from {} config",
            style("✓").green(),
            style(&args.key).cyan(),
            scope
        );
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = config_path(true)?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    print_exists(global_path.exists(), 9);

    println!();
    match config_path(false) {
        Ok(path) => {
            println!("  {} {}", style("Store:").cyan(), path.display());
            print_exists(path.exists(), 8);
        }
        Err(_) => println!(
            "  {} {}",
            style("Store:").cyan(),
            style("(not in an auto-parts store)").dim()
        ),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'autoparts config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn print_exists(exists: bool, indent: usize) {
    let note = if exists {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", note, indent = indent);
}

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))
    } else {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        Ok(project.config_path())
    }
}

fn read_mapping(path: &Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value =
        serde_yml::from_str(&content).unwrap_or(serde_yml::Value::Mapping(Default::default()));
    // A file holding only comments parses as null
    if parsed.is_null() {
        Ok(serde_yml::Value::Mapping(Default::default()))
    } else {
        Ok(parsed)
    }
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            "Unknown configuration key '{}'. Run 'autoparts config keys' for the list.",
            key
        ))
    }
}

/// Typed YAML value for a key, rejecting values the config cannot load
fn parse_config_value(key: &str, raw: &str) -> Result<serde_yml::Value> {
    match key {
        "confirm_delete" => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(serde_yml::Value::Bool(true)),
            "false" | "no" | "0" => Ok(serde_yml::Value::Bool(false)),
            _ => Err(miette::miette!("confirm_delete must be true or false")),
        },
        "default_format" => {
            OutputFormat::from_str(raw.trim(), true)
                .map_err(|_| miette::miette!("Unknown output format '{}'", raw))?;
            Ok(serde_yml::Value::String(raw.trim().to_lowercase()))
        }
        _ => Ok(serde_yml::Value::String(raw.to_string())),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "database" => config.database.as_ref().map(|p| p.display().to_string()),
        "default_format" => config.default_format.clone(),
        "confirm_delete" => config.confirm_delete.map(|b| b.to_string()),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_value() {
        assert_eq!(
            parse_config_value("confirm_delete", "no").unwrap(),
            serde_yml::Value::Bool(false)
        );
        assert_eq!(
            parse_config_value("default_format", "CSV").unwrap(),
            serde_yml::Value::String("csv".to_string())
        );
        assert!(parse_config_value("default_format", "yaml").is_err());
        assert!(parse_config_value("confirm_delete", "maybe").is_err());
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("database").is_ok());
        assert!(check_key("author").is_err());
    }

    #[test]
    fn test_config_values_round_trip_through_yaml() {
        let mut map = serde_yml::Mapping::new();
        map.insert(
            serde_yml::Value::String("confirm_delete".to_string()),
            parse_config_value("confirm_delete", "false").unwrap(),
        );
        let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(map)).unwrap();
        let config: Config = serde_yml::from_str(&yaml).unwrap();
        assert!(!config.confirm_delete());
    }
}
