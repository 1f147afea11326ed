//! `autoparts table` command - Browse, search and edit registry tables

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::{self, Column, TableDefinition};
use crate::cli::form::RecordForm;
use crate::cli::helpers::{open_store, parse_pairs, resolve_format};
use crate::cli::table::{table_columns, CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{ColumnKind, Config, StoreError, Value};
use crate::crud::{self, key_of, parse_key};
use crate::store::{QueryResult, Row};

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Show column metadata of a table
    Columns(ColumnsArgs),

    /// List the records of a table
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Find records whose column contains a text
    Search(SearchArgs),

    /// Show one record
    Show(KeyArgs),

    /// Insert a record
    New(NewArgs),

    /// Change fields of a record
    Edit(EditArgs),

    /// Delete a record
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// List the choices of a reference column
    Options(OptionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ColumnsArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Show at most N records
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Include hidden columns
    #[arg(long)]
    pub all_columns: bool,

    /// Wrap long text at this width instead of truncating
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Column to search, by header or property name
    pub column: String,

    /// Text the column must contain (case-sensitive)
    pub text: String,

    /// Include hidden columns
    #[arg(long)]
    pub all_columns: bool,
}

#[derive(clap::Args, Debug)]
pub struct KeyArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Key values in key column order, or name=value pairs
    #[arg(required = true, num_args = 1..)]
    pub key: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Field values as name=value (name by header, property or field)
    #[arg(long = "set", short = 's', value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Prompt for every field not given with --set
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Key values in key column order, or name=value pairs
    #[arg(required = true, num_args = 1..)]
    pub key: Vec<String>,

    /// New field values as name=value
    #[arg(long = "set", short = 's', value_name = "NAME=VALUE", required = true)]
    pub set: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Key values in key column order, or name=value pairs
    #[arg(required = true, num_args = 1..)]
    pub key: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// Table name (see `autoparts tables`)
    pub table: String,

    /// Reference column, by header, property or field name
    pub column: String,

    /// Record whose current choice is marked
    pub key: Vec<String>,
}

pub fn run(cmd: TableCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TableCommands::Columns(args) => run_columns(args, global),
        TableCommands::List(args) => run_list(args, global),
        TableCommands::Search(args) => run_search(args, global),
        TableCommands::Show(args) => run_show(args, global),
        TableCommands::New(args) => run_new(args, global),
        TableCommands::Edit(args) => run_edit(args, global),
        TableCommands::Delete(args) => run_delete(args, global),
        TableCommands::Options(args) => run_options(args, global),
    }
}

fn run_columns(args: ColumnsArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;

    let columns = [
        ColumnDef::new("header", "HEADER", ColumnKind::Text),
        ColumnDef::new("property", "PROPERTY", ColumnKind::Text),
        ColumnDef::new("field", "FIELD", ColumnKind::Text),
        ColumnDef::new("kind", "KIND", ColumnKind::Text),
        ColumnDef::new("flags", "FLAGS", ColumnKind::Text),
        ColumnDef::new("reference", "REFERENCE", ColumnKind::Text),
    ];

    let rows: Vec<TableRow> = def
        .columns
        .iter()
        .map(|c| {
            let field = c
                .field
                .map(|f| CellValue::Text(f.to_string()))
                .unwrap_or(CellValue::Empty);
            let reference = c
                .reference
                .map(|r| CellValue::Text(format!("{}.{}", r.table, r.display_property)))
                .unwrap_or(CellValue::Empty);
            TableRow::new(Some(c.property.to_string()))
                .cell("header", CellValue::Text(c.header.to_string()))
                .cell("property", CellValue::Text(c.property.to_string()))
                .cell("field", field)
                .cell("kind", CellValue::Text(c.kind.to_string()))
                .cell("flags", CellValue::Text(column_flags(c)))
                .cell("reference", reference)
        })
        .collect();

    TableFormatter::new(&columns, "column")
        .without_keys()
        .with_config(table_config(global, None))
        .output(&rows, resolve_format(global, OutputFormat::Tsv));
    Ok(())
}

/// Short flag summary, e.g. `id,hidden,ro`
fn column_flags(column: &Column) -> String {
    let mut flags = Vec::new();
    if column.is_id {
        flags.push("id");
    }
    if column.composite_key {
        flags.push("key");
    }
    if !column.visible {
        flags.push("hidden");
    }
    if column.field.is_none() {
        flags.push("computed");
    } else if !column.editable {
        flags.push("ro");
    }
    if column.field.is_some() && !column.creation_editable {
        flags.push("no-create");
    }
    if column.nullable {
        flags.push("null");
    }
    if column.has_default {
        flags.push("default");
    }
    flags.join(",")
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;

    let mut data = crud::table_data(&store, def)?;
    if let Some(limit) = args.limit {
        data.rows.truncate(limit);
    }

    output_records(def, &data, args.all_columns, args.wrap, global);
    Ok(())
}

fn run_search(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;

    let data = crud::search(&store, def, &args.column, &args.text)?;
    output_records(def, &data, args.all_columns, None, global);
    Ok(())
}

fn run_show(args: KeyArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;
    let key = parse_key(def, &args.key)?;

    let row = crud::get_display_row(&store, def, &key)?
        .ok_or_else(|| miette::miette!("No {} record with {}", def.name, key))?;

    match resolve_format(global, OutputFormat::Auto) {
        OutputFormat::Auto => {
            println!(
                "{} {}",
                style(def.display_name).bold(),
                style(format!("[{}]", key)).dim()
            );
            println!("{}", style("─".repeat(50)).dim());
            let width = def
                .columns
                .iter()
                .map(|c| c.header.chars().count())
                .max()
                .unwrap_or(0);
            for column in def.columns.iter().filter(|c| c.visible || c.is_key()) {
                let value = row.get(column.property).cloned().unwrap_or_default();
                let cell = CellValue::from_value(&value, column.kind);
                println!(
                    "{:<width$}  {}",
                    style(column.header).cyan(),
                    cell.display(),
                    width = width
                );
            }
        }
        format => {
            let data = QueryResult {
                columns: row.columns().map(String::from).collect(),
                rows: vec![row],
            };
            output_records_as(def, &data, false, None, global, format);
        }
    }
    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;

    let mut values = parse_pairs(&args.set)?;
    if args.interactive {
        values = RecordForm::new(&store, def).run(values)?;
    }

    let key = crud::insert(&store, def, &values)?;

    match global.format {
        OutputFormat::Id => println!("{}", key.to_args()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&key).into_diagnostic()?
        ),
        _ => {
            if !global.quiet {
                println!(
                    "{} Created {} record {}",
                    style("✓").green(),
                    def.name,
                    style(key.to_string()).cyan()
                );
            }
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;
    let key = parse_key(def, &args.key)?;
    let changes = parse_pairs(&args.set)?;

    let changed = crud::update(&store, def, &key, &changes)?;

    if !global.quiet {
        if changed == 0 {
            println!(
                "{} Nothing to change in {} record {}",
                style("!").yellow(),
                def.name,
                style(key.to_string()).cyan()
            );
        } else {
            println!(
                "{} Updated {} record {}",
                style("✓").green(),
                def.name,
                style(key.to_string()).cyan()
            );
        }
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let store = open_store(global)?;
    let key = parse_key(def, &args.key)?;

    if crud::get_by_key(&store, def, &key)?.is_none() {
        return Err(StoreError::not_found(def.name).into());
    }

    if !args.yes && Config::load().confirm_delete() {
        print!("Delete {} record {}? [y/N] ", def.name, key);
        std::io::Write::flush(&mut std::io::stdout()).into_diagnostic()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).into_diagnostic()?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    crud::delete(&store, def, &key)?;
    if !global.quiet {
        println!(
            "{} Deleted {} record {}",
            style("✓").green(),
            def.name,
            style(key.to_string()).cyan()
        );
    }
    Ok(())
}

fn run_options(args: OptionsArgs, global: &GlobalOpts) -> Result<()> {
    let def = catalog::find(&args.table)?;
    let column = def.column_for_input(&args.column)?;
    let store = open_store(global)?;

    let current = if args.key.is_empty() {
        None
    } else {
        let key = parse_key(def, &args.key)?;
        let record = crud::get_by_key(&store, def, &key)?
            .ok_or_else(|| miette::miette!("No {} record with {}", def.name, key))?;
        column
            .field
            .and_then(|field| record.get(field).cloned())
    };

    let options = crud::reference_options(&store, def, column.property, current.as_ref())?;

    let columns = [
        ColumnDef::new("id", "ID", ColumnKind::Integer),
        ColumnDef::new("label", column.header, ColumnKind::Text),
        ColumnDef::new("selected", "SELECTED", ColumnKind::Bool),
    ];
    let rows: Vec<TableRow> = options
        .iter()
        .map(|o| {
            let id = (!o.id.is_null()).then(|| o.id.to_string());
            TableRow::new(id)
                .cell("id", CellValue::from_value(&o.id, ColumnKind::Integer))
                .cell("label", CellValue::Text(o.label.clone()))
                .cell("selected", CellValue::Bool(o.selected))
        })
        .collect();

    TableFormatter::new(&columns, "choice")
        .without_keys()
        .with_config(table_config(global, None))
        .output(&rows, resolve_format(global, OutputFormat::Tsv));
    Ok(())
}

fn table_config(global: &GlobalOpts, wrap: Option<usize>) -> TableConfig {
    match (global.quiet, wrap) {
        (true, _) => TableConfig::for_pipe(),
        (false, Some(width)) => TableConfig::with_wrap(width),
        (false, None) => TableConfig::default(),
    }
}

/// Grid row for a record; the key is absent when the row lacks key values
fn record_row(def: &TableDefinition, columns: &[ColumnDef], row: &Row) -> TableRow {
    let key = key_of(def, row).ok().map(|k| k.to_args());
    columns.iter().fold(TableRow::new(key), |table_row, col| {
        let value = row.get(&col.key).cloned().unwrap_or(Value::Null);
        table_row.cell(col.key.clone(), CellValue::from_value(&value, col.kind))
    })
}

fn output_records(
    def: &TableDefinition,
    data: &QueryResult,
    all_columns: bool,
    wrap: Option<usize>,
    global: &GlobalOpts,
) {
    let format = resolve_format(global, OutputFormat::Tsv);
    output_records_as(def, data, all_columns, wrap, global, format);
}

fn output_records_as(
    def: &TableDefinition,
    data: &QueryResult,
    all_columns: bool,
    wrap: Option<usize>,
    global: &GlobalOpts,
    format: OutputFormat,
) {
    let columns = table_columns(def, all_columns);
    let rows: Vec<TableRow> = data
        .rows
        .iter()
        .map(|row| record_row(def, &columns, row))
        .collect();

    TableFormatter::new(&columns, "record")
        .with_config(table_config(global, wrap))
        .output(&rows, format);
}
