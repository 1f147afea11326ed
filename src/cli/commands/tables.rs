//! `autoparts tables` command - List the table registry

use miette::Result;

use crate::catalog;
use crate::cli::helpers::resolve_format;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ColumnKind;

#[derive(clap::Args, Debug)]
pub struct TablesArgs {
    /// Also count hidden and computed columns
    #[arg(long)]
    pub all_columns: bool,
}

pub fn run(args: TablesArgs, global: &GlobalOpts) -> Result<()> {
    let columns = [
        ColumnDef::new("name", "NAME", ColumnKind::Text),
        ColumnDef::new("display_name", "TITLE", ColumnKind::Text),
        ColumnDef::new("table", "SQL TABLE", ColumnKind::Text),
        ColumnDef::new("columns", "COLUMNS", ColumnKind::Integer),
        ColumnDef::new("key", "KEY", ColumnKind::Text),
    ];

    let rows: Vec<TableRow> = catalog::tables()
        .iter()
        .map(|def| {
            let count = def
                .columns
                .iter()
                .filter(|c| args.all_columns || c.visible)
                .count();
            let key: Vec<&str> = def
                .key_columns()
                .iter()
                .map(|c| c.field.unwrap_or(c.property))
                .collect();
            TableRow::new(Some(def.name.to_string()))
                .cell("name", CellValue::Text(def.name.to_string()))
                .cell("display_name", CellValue::Text(def.display_name.to_string()))
                .cell("table", CellValue::Text(def.table.to_string()))
                .cell("columns", CellValue::Number(count as i64))
                .cell("key", CellValue::Text(key.join(", ")))
        })
        .collect();

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(&columns, "table")
        .without_keys()
        .with_config(config)
        .output(&rows, resolve_format(global, OutputFormat::Tsv));
    Ok(())
}
