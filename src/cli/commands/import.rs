//! `autoparts import` command - Insert records from CSV files
//!
//! The first CSV row names the columns, by header, property or field name as
//! accepted by `table new --set`. Every following row becomes one insert.
//! Blank cells are left out so that defaults and NULLs apply.

use console::style;
use csv::{ReaderBuilder, StringRecord};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::catalog::{self, TableDefinition};
use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::GlobalOpts;
use crate::crud;
use crate::store::Store;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Table to import into (see `autoparts tables`)
    pub table: String,

    /// CSV file to import
    #[arg(required_unless_present = "template")]
    pub file: Option<PathBuf>,

    /// Validate rows without inserting
    #[arg(long)]
    pub dry_run: bool,

    /// Continue importing after errors (default: stop on first error)
    #[arg(long)]
    pub skip_errors: bool,

    /// Print a CSV header for the table instead of importing
    #[arg(long, conflicts_with = "file")]
    pub template: bool,
}

/// Import statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub rows_processed: usize,
    pub records_created: usize,
    pub errors: usize,
    pub skipped: usize,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;

    if args.template {
        println!("{}", template_header(def));
        return Ok(());
    }

    let file = args
        .file
        .ok_or_else(|| miette::miette!("No CSV file given"))?;
    if !file.exists() {
        return Err(miette::miette!("File not found: {}", file.display()));
    }

    let store = open_store(global)?;

    if !global.quiet {
        println!(
            "{} Importing {} from {}{}",
            style("→").blue(),
            style(def.display_name).cyan(),
            style(file.display()).yellow(),
            if args.dry_run { " (dry run)" } else { "" }
        );
    }

    let stats = import_file(&store, def, &file, args.dry_run, args.skip_errors)?;

    if !global.quiet {
        println!();
        println!("{}", style("Import Summary").bold());
        println!("  Rows processed: {}", stats.rows_processed);
        if args.dry_run {
            println!("  Valid rows:     {}", style(stats.records_created).green());
        } else {
            println!("  Records created: {}", style(stats.records_created).green());
        }
        if stats.skipped > 0 {
            println!("  Skipped:        {}", style(stats.skipped).yellow());
        }
        if stats.errors > 0 {
            println!("  Errors:         {}", style(stats.errors).red());
        }
    }
    Ok(())
}

/// Header line listing the creation-editable columns by field name
fn template_header(def: &TableDefinition) -> String {
    def.creation_columns()
        .filter_map(|c| c.field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Import every record of a CSV file.
///
/// A dry run inserts inside a savepoint that is rolled back, so constraint
/// errors are still reported.
pub fn import_file(
    store: &Store,
    def: &TableDefinition,
    path: &Path,
    dry_run: bool,
    skip_errors: bool,
) -> Result<ImportStats> {
    let file = File::open(path).into_diagnostic()?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers().into_diagnostic()?.clone();
    for header in headers.iter() {
        def.column_for_input(header)?;
    }

    if dry_run {
        store.execute("SAVEPOINT import_dry_run", [])?;
    }
    let result = import_records(store, def, &headers, rdr.records(), skip_errors);
    if dry_run {
        store.execute("ROLLBACK TO import_dry_run", [])?;
        store.execute("RELEASE import_dry_run", [])?;
    }
    result
}

fn import_records<I>(
    store: &Store,
    def: &TableDefinition,
    headers: &StringRecord,
    records: I,
    skip_errors: bool,
) -> Result<ImportStats>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    let mut stats = ImportStats::default();

    for (row_idx, result) in records.enumerate() {
        let row_num = row_idx + 2;
        stats.rows_processed += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{} Row {}: CSV parse error: {}", style("✗").red(), row_num, e);
                stats.errors += 1;
                if !skip_errors {
                    return Err(miette::miette!("CSV parse error at row {}: {}", row_num, e));
                }
                continue;
            }
        };

        if record.iter().all(|f| f.trim().is_empty()) {
            stats.skipped += 1;
            continue;
        }

        let values: Vec<(String, String)> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();

        match crud::insert(store, def, &values) {
            Ok(key) => {
                stats.records_created += 1;
                tracing::debug!(row = row_num, key = %key, "imported row");
            }
            Err(e) => {
                let preview = record.iter().collect::<Vec<_>>().join(",");
                eprintln!(
                    "{} Row {} ({}): {}",
                    style("✗").red(),
                    row_num,
                    truncate_str(&preview, 40),
                    e
                );
                stats.errors += 1;
                if !skip_errors {
                    return Err(miette::miette!("Import failed at row {}: {}", row_num, e));
                }
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn demo() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();
        store
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn product_count(store: &Store) -> usize {
        let def = catalog::find("products").unwrap();
        crud::table_data(store, def).unwrap().len()
    }

    #[test]
    fn test_import_products() {
        let store = demo();
        let def = catalog::find("products").unwrap();
        let file = csv_file("Name,Sale price,product_description\nWiper blade,9.90,\nCabin filter,\"14,30\",Carbon\n");

        let stats = import_file(&store, def, file.path(), false, false).unwrap();
        assert_eq!(stats.rows_processed, 2);
        assert_eq!(stats.records_created, 2);
        assert_eq!(product_count(&store), 7);

        let found = crud::search(&store, def, "Name", "Cabin").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_dry_run_inserts_nothing() {
        let store = demo();
        let def = catalog::find("products").unwrap();
        let file = csv_file("Name,Sale price\nWiper blade,9.90\n");

        let stats = import_file(&store, def, file.path(), true, false).unwrap();
        assert_eq!(stats.records_created, 1);
        assert_eq!(product_count(&store), 5);
    }

    #[test]
    fn test_skip_errors_continues() {
        let store = demo();
        let def = catalog::find("products").unwrap();
        let file = csv_file("Name,Sale price\nWiper blade,cheap\n\nMirror,30\n");

        assert!(import_file(&store, def, file.path(), false, false).is_err());

        let store = demo();
        let stats = import_file(&store, def, file.path(), false, true).unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.records_created, 1);
        assert_eq!(product_count(&store), 6);
    }

    #[test]
    fn test_unknown_header_rejected() {
        let store = demo();
        let def = catalog::find("products").unwrap();
        let file = csv_file("Name,Colour\nWiper blade,red\n");
        assert!(import_file(&store, def, file.path(), false, false).is_err());
    }

    #[test]
    fn test_template_lists_fields() {
        let def = catalog::find("products").unwrap();
        assert_eq!(
            template_header(def),
            "product_name,product_sale_price,product_description"
        );
    }
}
