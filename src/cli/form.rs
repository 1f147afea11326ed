//! Interactive record form
//!
//! Prompts for every creation-editable column of a table, in registry
//! order. Reference columns are picked from the referenced table's rows;
//! other columns are typed in and checked against the column kind before
//! the prompt is accepted.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::catalog::{Column, TableDefinition};
use crate::crud;
use crate::store::Store;

/// A registry-driven form for creating records
pub struct RecordForm<'a> {
    store: &'a Store,
    def: &'a TableDefinition,
    theme: ColorfulTheme,
}

impl<'a> RecordForm<'a> {
    pub fn new(store: &'a Store, def: &'a TableDefinition) -> Self {
        Self {
            store,
            def,
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for each column not already in `preset`; returns preset
    /// values followed by the answers.
    pub fn run(&self, preset: Vec<(String, String)>) -> Result<Vec<(String, String)>> {
        println!();
        println!(
            "{} New record in {}",
            style("◆").cyan(),
            style(self.def.display_name).bold()
        );
        println!("{}", style("─".repeat(50)).dim());

        let mut values = preset;
        for column in self.def.creation_columns() {
            let given = values.iter().any(|(name, _)| column.matches(name));
            if given || column.field.is_none() {
                continue;
            }
            let answer = match column.reference {
                Some(_) => self.pick_reference(column)?,
                None => self.prompt_value(column)?,
            };
            if let (Some(answer), Some(field)) = (answer, column.field) {
                values.push((field.to_string(), answer));
            }
        }

        println!();
        Ok(values)
    }

    fn pick_reference(&self, column: &Column) -> Result<Option<String>> {
        let options = crud::reference_options(self.store, self.def, column.property, None)?;
        if options.is_empty() {
            return Err(miette::miette!(
                "No entries to choose from for '{}'",
                column.header
            ));
        }

        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let default_idx = options.iter().position(|o| o.selected).unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(column.header)
            .items(&labels)
            .default(default_idx)
            .interact()
            .into_diagnostic()?;

        let id = &options[selection].id;
        Ok((!id.is_null()).then(|| id.to_string()))
    }

    fn prompt_value(&self, column: &Column) -> Result<Option<String>> {
        let prompt = if column.is_required() {
            format!("{} ({})", column.header, column.kind.expected())
        } else {
            format!("{} ({}, optional)", column.header, column.kind.expected())
        };

        let checked = *column;
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(&prompt)
            .allow_empty(!column.is_required())
            .validate_with(move |input: &String| -> std::result::Result<(), String> {
                crud::parse_new_input(&checked, input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .into_diagnostic()?;

        Ok((!value.trim().is_empty()).then_some(value))
    }
}
