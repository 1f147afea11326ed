//! `autoparts report` command - List and run analytical reports

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_store, parse_pairs, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ColumnKind;
use crate::reports::{
    self, ParamInput, ReportDefinition, ReportParam, ReportResult, ReportVariation,
};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List every report and its variations
    #[command(visible_alias = "ls")]
    List,

    /// Describe a report: variations, parameters and their choices
    Show(ShowArgs),

    /// Run a report variation
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Report name (see `autoparts report list`)
    pub report: String,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Report name (see `autoparts report list`)
    pub report: String,

    /// Variation to run (default: the first)
    #[arg(long)]
    pub variation: Option<String>,

    /// Parameter value as name=value; choices accept an id or a name
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Prompt for parameters not given with --param
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Write a Markdown report to this file instead of printing rows
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::List => run_list(global),
        ReportCommands::Show(args) => run_show(args, global),
        ReportCommands::Run(args) => run_report(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let columns = [
        ColumnDef::new("name", "NAME", ColumnKind::Text),
        ColumnDef::new("title", "TITLE", ColumnKind::Text),
        ColumnDef::new("variations", "VARIATIONS", ColumnKind::Text),
    ];

    let rows: Vec<TableRow> = reports::reports()
        .iter()
        .map(|r| {
            let variations: Vec<&str> = r.variations.iter().map(|v| v.name).collect();
            TableRow::new(Some(r.name.to_string()))
                .cell("name", CellValue::Text(r.name.to_string()))
                .cell("title", CellValue::Text(r.title.to_string()))
                .cell("variations", CellValue::Text(variations.join(", ")))
        })
        .collect();

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(&columns, "report")
        .without_keys()
        .with_config(config)
        .output(&rows, resolve_format(global, OutputFormat::Tsv));
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let report = reports::find_report(&args.report)?;

    // Choices need a database; describe the report without them otherwise
    let store = match open_store(global) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::debug!(error = %e, "showing report without parameter choices");
            None
        }
    };

    if resolve_format(global, OutputFormat::Auto) == OutputFormat::Json {
        let value = describe_json(report, store.as_ref())?;
        println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        return Ok(());
    }

    println!(
        "{} {}",
        style(report.title).bold(),
        style(format!("({})", report.name)).dim()
    );
    println!("{}", report.description);

    for variation in report.variations {
        println!();
        println!(
            "  {} {}",
            style(variation.name).cyan().bold(),
            style(format!("- {}", variation.title)).bold()
        );
        println!("    {}", style(variation.description).dim());
        if variation.params.is_empty() {
            println!("    {}", style("no parameters").dim());
        }
        for param in variation.params {
            println!(
                "    {:<14} {} ({})",
                style(param.name).yellow(),
                param.label,
                input_name(param)
            );
            if let Some(store) = &store {
                for choice in reports::choices(store, param)? {
                    println!(
                        "        {:>4}  {}",
                        style(choice.id.to_string()).cyan(),
                        choice.label
                    );
                }
            }
        }
    }
    Ok(())
}

fn input_name(param: &ReportParam) -> String {
    match param.input {
        ParamInput::Text => param.kind.to_string(),
        ParamInput::Date => "date".to_string(),
        ParamInput::Choice { table, .. } => format!("choice from {}", table),
    }
}

fn describe_json(report: &ReportDefinition, store: Option<&Store>) -> Result<serde_json::Value> {
    let mut variations = Vec::new();
    for variation in report.variations {
        let mut params = Vec::new();
        for param in variation.params {
            let choices = match store {
                Some(store) => reports::choices(store, param)?,
                None => Vec::new(),
            };
            params.push(json!({
                "name": param.name,
                "label": param.label,
                "input": input_name(param),
                "choices": choices,
            }));
        }
        variations.push(json!({
            "name": variation.name,
            "title": variation.title,
            "description": variation.description,
            "params": params,
        }));
    }
    Ok(json!({
        "name": report.name,
        "title": report.title,
        "description": report.description,
        "variations": variations,
    }))
}

fn run_report(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let report = reports::find_report(&args.report)?;
    let variation = report.variation(args.variation.as_deref())?;
    let store = open_store(global)?;

    let mut params = parse_pairs(&args.params)?;
    if args.interactive {
        prompt_missing(&store, variation, &mut params)?;
    }

    let result = reports::run(&store, variation, &params)?;

    if let Some(path) = args.output {
        let markdown = render_markdown(report, variation, &params, &result);
        write_output(&markdown, &path)?;
        if !global.quiet {
            println!(
                "{} Report written to {} ({} rows)",
                style("✓").green(),
                style(path.display()).cyan(),
                result.len()
            );
        }
        return Ok(());
    }

    let columns = result_columns(&result);
    let rows: Vec<TableRow> = result
        .rows
        .iter()
        .map(|row| {
            columns.iter().fold(TableRow::new(None), |table_row, col| {
                let cell = row
                    .get(&col.key)
                    .map(CellValue::infer)
                    .unwrap_or(CellValue::Empty);
                table_row.cell(col.key.clone(), cell)
            })
        })
        .collect();

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(&columns, "row")
        .without_keys()
        .with_config(config)
        .output(&rows, resolve_format(global, OutputFormat::Tsv));
    Ok(())
}

/// Ask for every parameter not already given
fn prompt_missing(
    store: &Store,
    variation: &ReportVariation,
    params: &mut Vec<(String, String)>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    for param in variation.params {
        if params.iter().any(|(name, _)| name.eq_ignore_ascii_case(param.name)) {
            continue;
        }

        let value = match param.input {
            ParamInput::Choice { .. } => {
                let choices = reports::choices(store, param)?;
                if choices.is_empty() {
                    return Err(miette::miette!("No entries to choose from for '{}'", param.label));
                }
                let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
                let selection = Select::with_theme(&theme)
                    .with_prompt(param.label)
                    .items(&labels)
                    .default(0)
                    .interact()
                    .into_diagnostic()?;
                choices[selection].id.to_string()
            }
            ParamInput::Date | ParamInput::Text => {
                let kind = param.kind;
                Input::<String>::with_theme(&theme)
                    .with_prompt(format!("{} ({})", param.label, kind.expected()))
                    .validate_with(move |input: &String| -> std::result::Result<(), String> {
                        crate::core::Value::parse(kind, input)
                            .map(|_| ())
                            .map_err(|e| e.to_string())
                    })
                    .interact_text()
                    .into_diagnostic()?
            }
        };
        params.push((param.name.to_string(), value));
    }
    Ok(())
}

/// Grid columns for a result set, sized by the first non-null value
fn result_columns(result: &ReportResult) -> Vec<ColumnDef> {
    result
        .columns
        .iter()
        .map(|name| {
            let kind = result
                .rows
                .iter()
                .filter_map(|r| r.get(name))
                .map(CellValue::infer)
                .find(|c| *c != CellValue::Empty)
                .map(|c| match c {
                    CellValue::Number(_) => ColumnKind::Integer,
                    CellValue::Decimal(_) => ColumnKind::Decimal,
                    CellValue::Bool(_) => ColumnKind::Bool,
                    CellValue::Date(_) => ColumnKind::Date,
                    CellValue::DateTime(_) => ColumnKind::DateTime,
                    CellValue::Text(_) | CellValue::Empty => ColumnKind::Text,
                })
                .unwrap_or(ColumnKind::Text);
            ColumnDef::new(name.clone(), name.clone(), kind)
        })
        .collect()
}

fn render_markdown(
    report: &ReportDefinition,
    variation: &ReportVariation,
    params: &[(String, String)],
    result: &ReportResult,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", report.title));
    output.push_str(&format!("**{}**: {}\n\n", variation.title, variation.description));

    if !variation.params.is_empty() {
        output.push_str("## Parameters\n\n");
        for param in variation.params {
            let given = params
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(param.name))
                .map(|(_, v)| v.as_str())
                .unwrap_or("-");
            output.push_str(&format!("- **{}:** {}\n", param.label, given));
        }
        output.push('\n');
    }

    output.push_str("## Results\n\n");
    if result.is_empty() {
        output.push_str("*No rows.*\n");
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().map(String::as_str));
    for row in &result.rows {
        builder.push_record(
            result
                .columns
                .iter()
                .map(|name| row.get(name).map(CellValue::infer).unwrap_or(CellValue::Empty))
                .map(|cell| cell.format_md()),
        );
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());
    output.push_str(&format!("\n\n- **Rows:** {}\n", result.len()));
    output
}

fn write_output(content: &str, path: &PathBuf) -> Result<()> {
    let file = File::create(path).into_diagnostic()?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).into_diagnostic()?;
    writer.flush().into_diagnostic()?;
    Ok(())
}
