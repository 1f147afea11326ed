//! `autoparts status` command - Store status dashboard

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog;
use crate::cli::helpers::{open_store, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ColumnKind;
use crate::reports;
use crate::store::SCHEMA_VERSION;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Also list tables without records
    #[arg(long)]
    pub all: bool,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let version = store.schema_version()?;
    let counts = store.table_counts()?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();

    // Registry name for each SQL table, falling back to the table itself
    let named: Vec<(String, i64)> = counts
        .iter()
        .filter(|(_, n)| args.all || *n > 0)
        .map(|(table, n)| {
            let name = catalog::tables()
                .iter()
                .find(|d| d.table == *table)
                .map(|d| d.name)
                .unwrap_or(*table);
            (name.to_string(), *n)
        })
        .collect();

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Json => {
            let tables: serde_json::Map<String, serde_json::Value> = named
                .iter()
                .map(|(name, n)| (name.clone(), serde_json::json!(n)))
                .collect();
            let status = serde_json::json!({
                "database": store.path().map(|p| p.display().to_string()),
                "schema_version": version,
                "records": total,
                "tables": tables,
                "reports": reports::reports().len(),
            });
            println!("{}", serde_json::to_string_pretty(&status).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            let width = 48;
            println!("{}", style("Auto-Parts Store Status").bold().underlined());
            println!("{}", "═".repeat(width));
            if let Some(path) = store.path() {
                println!("{:<16}{}", "Database:", style(path.display()).cyan());
            }
            let version_note = if version == SCHEMA_VERSION {
                style("(current)".to_string()).green()
            } else {
                style(format!("(expected {})", SCHEMA_VERSION)).red()
            };
            println!("{:<16}{} {}", "Schema version:", version, version_note);
            println!("{:<16}{}", "Records:", style(total).cyan());
            println!("{:<16}{}", "Reports:", reports::reports().len());
            println!();

            if named.is_empty() {
                println!(
                    "{} The store is empty. Try {}",
                    style("!").yellow(),
                    style("autoparts init --demo").yellow()
                );
                return Ok(());
            }

            println!("{}", style("RECORDS").bold());
            println!("{}", "─".repeat(width));
            let name_width = named.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
            for (name, n) in &named {
                println!(
                    "  {:<name_width$}  {:>6}",
                    name,
                    n,
                    name_width = name_width
                );
            }
        }
        format => {
            let columns = [
                ColumnDef::new("table", "TABLE", ColumnKind::Text),
                ColumnDef::new("records", "RECORDS", ColumnKind::Integer),
            ];
            let rows: Vec<TableRow> = named
                .iter()
                .map(|(name, n)| {
                    TableRow::new(Some(name.clone()))
                        .cell("table", CellValue::Text(name.clone()))
                        .cell("records", CellValue::Number(*n))
                })
                .collect();
            TableFormatter::new(&columns, "table")
                .with_config(TableConfig::for_pipe())
                .without_keys()
                .output(&rows, format);
        }
    }
    Ok(())
}
