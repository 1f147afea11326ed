//! Table formatting for grids, search results and reports
//!
//! Columns come from the registry (or from a report's result set) at run
//! time, so cells carry their value kind and are rendered per format:
//!
//! - TSV: aligned, coloured, text truncated to the column width
//! - CSV: RFC 4180, raw values
//! - Markdown: pipe table with escaped cell text
//! - JSON: array of objects keyed by column header
//! - ID: record keys only, one per line
//!
//! Empty values render as `-` everywhere except CSV and JSON.

use chrono::{NaiveDate, NaiveDateTime};
use console::style;
use serde_json::json;

use crate::catalog::{Column, TableDefinition};
use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::value::{DATETIME_FORMAT, DATE_FORMAT};
use crate::core::{ColumnKind, Value};

const NULL_DISPLAY: &str = "-";

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show summary line after table (e.g., "5 product(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    /// Create config with text wrapping enabled at the specified width
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            show_summary: true,
        }
    }

    /// Create config optimized for piping (no wrapping, no summary)
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if !current.is_empty() && current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // Force-break words longer than a whole line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text, truncated in TSV
    Text(String),
    /// Whole number, right-aligned
    Number(i64),
    /// Money and quantities, two decimal places
    Decimal(f64),
    /// Flag shown as yes/no
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Null
    Empty,
}

impl CellValue {
    /// Cell for a stored value, rendered according to the column kind
    pub fn from_value(value: &Value, kind: ColumnKind) -> Self {
        match (value.clone().coerce(kind), kind) {
            (Value::Null, _) => CellValue::Empty,
            (Value::Integer(n), ColumnKind::Decimal) => CellValue::Decimal(n as f64),
            (Value::Integer(n), _) => CellValue::Number(n),
            (Value::Real(f), _) => CellValue::Decimal(f),
            (Value::Bool(b), _) => CellValue::Bool(b),
            (Value::Date(d), _) => CellValue::Date(d),
            (Value::DateTime(dt), _) => CellValue::DateTime(dt),
            (Value::Text(s), _) => CellValue::Text(s),
        }
    }

    /// Cell for a value whose column kind is unknown (report results)
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Integer(n) => CellValue::Number(*n),
            Value::Real(f) => CellValue::Decimal(*f),
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Date(d) => CellValue::Date(*d),
            Value::DateTime(dt) => CellValue::DateTime(*dt),
            Value::Text(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
                    CellValue::Date(d)
                } else {
                    CellValue::Text(s.clone())
                }
            }
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_) | CellValue::Decimal(_))
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width);
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Number(_) | CellValue::Decimal(_) => {
                format!("{:>width$}", self.raw(), width = width)
            }
            CellValue::Bool(b) => {
                let styled = if *b {
                    style("yes").green()
                } else {
                    style("no").dim()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(_) | CellValue::DateTime(_) => {
                format!("{:<width$}", self.raw(), width = width)
            }
            CellValue::Empty => format!("{:<width$}", style(NULL_DISPLAY).dim(), width = width),
        }
    }

    /// Format for CSV output
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for markdown output
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Empty => NULL_DISPLAY.to_string(),
            _ => self.raw().replace('|', "\\|").replace('\n', " "),
        }
    }

    /// JSON value; decimals stay numbers
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(s) => json!(s),
            CellValue::Number(n) => json!(n),
            CellValue::Decimal(f) => json!(f),
            CellValue::Bool(b) => json!(b),
            CellValue::Date(_) | CellValue::DateTime(_) => json!(self.raw()),
            CellValue::Empty => serde_json::Value::Null,
        }
    }

    /// Get raw string value (no styling); empty for nulls
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Decimal(f) => format!("{:.2}", f),
            CellValue::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
            CellValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            CellValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Text shown to a reader, with the null marker
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => NULL_DISPLAY.to_string(),
            _ => self.raw(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            CellValue::Bool(_) => 3,
            CellValue::Date(_) => 10,
            CellValue::DateTime(_) => 19,
            _ => self.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Name the value is looked up by in a row
    pub key: String,
    pub header: String,
    pub kind: ColumnKind,
    pub width: usize,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, header: impl Into<String>, kind: ColumnKind) -> Self {
        let width = match kind {
            ColumnKind::Text => 40,
            ColumnKind::Integer => 12,
            ColumnKind::Decimal => 14,
            ColumnKind::Bool => 5,
            ColumnKind::Date => 10,
            ColumnKind::DateTime => 19,
        };
        Self {
            key: key.into(),
            header: header.into(),
            kind,
            width,
        }
    }

    /// Grid column for a registry column
    pub fn from_column(column: &Column) -> Self {
        Self::new(column.property, column.header, column.kind)
    }
}

/// Grid columns of a table: the visible ones, or every column
pub fn table_columns(def: &TableDefinition, all: bool) -> Vec<ColumnDef> {
    def.columns
        .iter()
        .filter(|c| all || c.visible)
        .map(ColumnDef::from_column)
        .collect()
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    /// Record key in command-line form, if the row has one
    pub key: Option<String>,
    pub cells: Vec<(String, CellValue)>,
}

impl TableRow {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: impl Into<String>, value: CellValue) -> Self {
        self.cells.push((key.into(), value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'a str,
    show_keys: bool,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'a str) -> Self {
        Self {
            columns,
            entity_name,
            show_keys: true,
            config: TableConfig::default(),
        }
    }

    /// Omit the key column (report results have no record keys)
    pub fn without_keys(mut self) -> Self {
        self.show_keys = false;
        self
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        match format {
            OutputFormat::Csv => self.output_csv(rows),
            OutputFormat::Md => self.output_md(rows),
            OutputFormat::Json => self.output_json(rows),
            OutputFormat::Id => self.output_ids(rows),
            OutputFormat::Tsv | OutputFormat::Auto => self.output_tsv(rows),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.columns.len() + 1);

        if self.show_keys {
            let key_width = rows
                .iter()
                .filter_map(|r| r.key.as_ref())
                .map(|k| k.chars().count())
                .max()
                .unwrap_or(0)
                .max(3);
            widths.push(key_width);
        }

        for col in self.columns {
            let header_len = col.header.chars().count();
            let max_content = rows
                .iter()
                .filter_map(|r| r.get(&col.key))
                .map(|v| v.display_width())
                .max()
                .unwrap_or(0);
            // Never narrower than the header; content is capped at the column width
            widths.push(header_len.max(max_content.min(col.width)));
        }

        widths
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);
        let mut width_idx = 0;

        let mut header_parts = Vec::new();
        if self.show_keys {
            header_parts.push(format!(
                "{:<width$}",
                style("KEY").bold().dim(),
                width = widths[0]
            ));
            width_idx = 1;
        }
        for (col, width) in self.columns.iter().zip(&widths[width_idx..]) {
            let header = format!("{:<width$}", col.header, width = width);
            header_parts.push(style(header).bold().to_string());
        }
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            match self.config.wrap_width {
                Some(wrap_width) => self.output_tsv_row_wrapped(row, &widths, wrap_width),
                None => self.output_tsv_row_truncated(row, &widths),
            }
        }

        if self.config.show_summary {
            println!();
            println!(
                "{} {}(s) found.",
                style(rows.len()).cyan(),
                self.entity_name
            );
        }
    }

    fn output_tsv_row_truncated(&self, row: &TableRow, widths: &[usize]) {
        let mut row_parts = Vec::new();
        let mut width_idx = 0;

        if self.show_keys {
            let key = row.key.as_deref().unwrap_or(NULL_DISPLAY);
            row_parts.push(format!("{:<width$}", style(key).cyan(), width = widths[0]));
            width_idx = 1;
        }

        for (col, &w) in self.columns.iter().zip(&widths[width_idx..]) {
            match row.get(&col.key) {
                Some(value) => row_parts.push(value.format_tsv(w)),
                None => row_parts.push(CellValue::Empty.format_tsv(w)),
            }
        }
        println!("{}", row_parts.join(" "));
    }

    fn output_tsv_row_wrapped(&self, row: &TableRow, widths: &[usize], wrap_width: usize) {
        let mut wrapped_cells: Vec<(Vec<String>, bool)> = Vec::new();

        if self.show_keys {
            let key = row.key.clone().unwrap_or_else(|| NULL_DISPLAY.to_string());
            wrapped_cells.push((vec![key], false));
        }

        for col in self.columns {
            let cell = row.get(&col.key).cloned().unwrap_or(CellValue::Empty);
            let lines = match &cell {
                CellValue::Text(s) => wrap_text(s, wrap_width),
                other => vec![other.display()],
            };
            wrapped_cells.push((lines, cell.is_numeric()));
        }

        let max_lines = wrapped_cells.iter().map(|(c, _)| c.len()).max().unwrap_or(1);

        for line_idx in 0..max_lines {
            let mut row_parts = Vec::new();
            for (col_idx, (lines, right)) in wrapped_cells.iter().enumerate() {
                let width = widths.get(col_idx).copied().unwrap_or(10);
                let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                if self.show_keys && col_idx == 0 {
                    row_parts.push(format!("{:<width$}", style(content).cyan(), width = width));
                } else if *right {
                    row_parts.push(format!("{:>width$}", content, width = width));
                } else {
                    row_parts.push(format!("{:<width$}", content, width = width));
                }
            }
            println!("{}", row_parts.join(" "));
        }

        if max_lines > 1 {
            println!();
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let mut headers = Vec::new();
        if self.show_keys {
            headers.push("key".to_string());
        }
        headers.extend(self.columns.iter().map(|c| escape_csv(&c.header)));
        println!("{}", headers.join(","));

        for row in rows {
            let mut values = Vec::new();
            if self.show_keys {
                values.push(escape_csv(row.key.as_deref().unwrap_or_default()));
            }
            for col in self.columns {
                values.push(row.get(&col.key).map(|v| v.format_csv()).unwrap_or_default());
            }
            println!("{}", values.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        let mut headers = Vec::new();
        if self.show_keys {
            headers.push("Key".to_string());
        }
        headers.extend(self.columns.iter().map(|c| c.header.replace('|', "\\|")));
        println!("| {} |", headers.join(" | "));

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        println!("|{}|", separators.join("|"));

        for row in rows {
            let mut values = Vec::new();
            if self.show_keys {
                values.push(row.key.clone().unwrap_or_else(|| NULL_DISPLAY.to_string()));
            }
            for col in self.columns {
                values.push(
                    row.get(&col.key)
                        .map(|v| v.format_md())
                        .unwrap_or_else(|| NULL_DISPLAY.to_string()),
                );
            }
            println!("| {} |", values.join(" | "));
        }
    }

    fn output_json(&self, rows: &[TableRow]) {
        println!("{}", self.to_json(rows));
    }

    /// Rows as a pretty-printed JSON array of objects
    pub fn to_json(&self, rows: &[TableRow]) -> String {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let mut object = serde_json::Map::new();
                if self.show_keys {
                    if let Some(key) = &row.key {
                        object.insert("key".to_string(), json!(key));
                    }
                }
                for col in self.columns {
                    let value = row
                        .get(&col.key)
                        .map(|v| v.to_json())
                        .unwrap_or(serde_json::Value::Null);
                    object.insert(col.header.clone(), value);
                }
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Keys one per line; without keys the first column stands in
    fn output_ids(&self, rows: &[TableRow]) {
        for row in rows {
            match (&row.key, self.columns.first()) {
                (Some(key), _) if self.show_keys => println!("{}", key),
                (_, Some(first)) => println!(
                    "{}",
                    row.get(&first.key).map(|v| v.raw()).unwrap_or_default()
                ),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::Text("Hello World".to_string());
        let tsv = cell.format_tsv(20);
        assert!(tsv.contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_cell_value_from_value_by_kind() {
        assert_eq!(
            CellValue::from_value(&Value::Integer(45), ColumnKind::Decimal).raw(),
            "45.00"
        );
        assert_eq!(
            CellValue::from_value(&Value::Integer(1), ColumnKind::Bool),
            CellValue::Bool(true)
        );
        assert_eq!(
            CellValue::from_value(&Value::Text("2024-02-10".into()), ColumnKind::Date).raw(),
            "2024-02-10"
        );
        assert_eq!(
            CellValue::from_value(&Value::Null, ColumnKind::Text),
            CellValue::Empty
        );
    }

    #[test]
    fn test_cell_value_empty() {
        let cell = CellValue::Empty;
        assert_eq!(cell.format_csv(), "");
        assert_eq!(cell.format_md(), "-");
        assert_eq!(cell.display(), "-");
        assert_eq!(cell.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_cell_value_decimal_two_places() {
        let cell = CellValue::Decimal(376.75);
        assert_eq!(cell.raw(), "376.75");
        assert_eq!(CellValue::Decimal(12.0).raw(), "12.00");
        assert_eq!(cell.to_json(), json!(376.75));
    }

    #[test]
    fn test_cell_value_bool_yes_no() {
        assert_eq!(CellValue::Bool(true).format_csv(), "yes");
        assert_eq!(CellValue::Bool(false).format_md(), "no");
    }

    #[test]
    fn test_cell_value_md_escapes_pipes() {
        let cell = CellValue::Text("a|b|c".to_string());
        assert_eq!(cell.format_md(), "a\\|b\\|c");
    }

    #[test]
    fn test_cell_value_csv_quotes() {
        let cell = CellValue::Text("Brake pads, front".to_string());
        assert_eq!(cell.format_csv(), "\"Brake pads, front\"");
    }

    #[test]
    fn test_infer_recognises_dates() {
        assert_eq!(
            CellValue::infer(&Value::Text("2024-02-10".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap())
        );
        assert_eq!(
            CellValue::infer(&Value::Text("Bosch Parts".into())),
            CellValue::Text("Bosch Parts".into())
        );
    }

    #[test]
    fn test_column_def_widths() {
        let col = ColumnDef::new("product_name", "Name", ColumnKind::Text);
        assert_eq!(col.key, "product_name");
        assert_eq!(col.header, "Name");
        assert_eq!(col.width, 40);
    }

    #[test]
    fn test_table_columns_hide_invisible() {
        let def = crate::catalog::find("products").unwrap();
        let visible: Vec<_> = table_columns(def, false).into_iter().map(|c| c.key).collect();
        assert!(!visible.contains(&"product_id".to_string()));
        let all: Vec<_> = table_columns(def, true).into_iter().map(|c| c.key).collect();
        assert!(all.contains(&"product_id".to_string()));
    }

    #[test]
    fn test_table_row_builder() {
        let row = TableRow::new(Some("1".to_string()))
            .cell("product_name", CellValue::Text("Oil filter".to_string()))
            .cell("product_sale_price", CellValue::Decimal(12.0));

        assert_eq!(row.key.as_deref(), Some("1"));
        assert!(row.get("PRODUCT_NAME").is_some());
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_json_output_uses_headers() {
        let columns = vec![
            ColumnDef::new("product_name", "Name", ColumnKind::Text),
            ColumnDef::new("product_description", "Description", ColumnKind::Text),
        ];
        let rows = vec![TableRow::new(Some("2".to_string()))
            .cell("product_name", CellValue::Text("Oil filter".to_string()))
            .cell("product_description", CellValue::Empty)];
        let out = TableFormatter::new(&columns, "product").to_json(&rows);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["key"], json!("2"));
        assert_eq!(parsed[0]["Name"], json!("Oil filter"));
        assert!(parsed[0]["Description"].is_null());
    }

    #[test]
    fn test_wrap_text_short() {
        assert_eq!(wrap_text("hello", 20), vec!["hello"]);
    }

    #[test]
    fn test_wrap_text_word_boundary() {
        assert_eq!(
            wrap_text("hello world foo bar", 11),
            vec!["hello world", "foo bar"]
        );
    }

    #[test]
    fn test_wrap_text_long_word() {
        let result = wrap_text("supercalifragilisticexpialidocious", 10);
        assert_eq!(
            result,
            vec!["supercalif", "ragilistic", "expialidoc", "ious"]
        );
    }

    #[test]
    fn test_table_config_for_pipe() {
        let config = TableConfig::for_pipe();
        assert!(config.wrap_width.is_none());
        assert!(!config.show_summary);
        assert_eq!(TableConfig::with_wrap(40).wrap_width, Some(40));
    }
}
