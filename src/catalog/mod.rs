//! Table metadata registry
//!
//! Each entity the shop exposes is described once, statically: how to
//! query it for display, which columns are shown, which identify a record,
//! which can be edited, and which are foreign keys chosen from another table.
//! The CRUD engine and the command line are driven entirely by these
//! definitions.

mod tables;

pub use tables::TABLES;

use crate::core::{ColumnKind, Result, StoreError};

/// Foreign key target of a reference column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Registry name of the referenced table
    pub table: &'static str,
    /// Property of the referenced select holding the id
    pub id_property: &'static str,
    /// Property of the referenced select shown to the user
    pub display_property: &'static str,
}

/// Display and edit metadata for one column
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Header shown in grids and forms
    pub header: &'static str,
    /// Name of the value in the table's select
    pub property: &'static str,
    /// Storage column written on insert/update; `None` for computed columns
    pub field: Option<&'static str>,
    pub kind: ColumnKind,
    pub visible: bool,
    pub is_id: bool,
    pub composite_key: bool,
    pub editable: bool,
    pub creation_editable: bool,
    pub visible_in_edit: bool,
    pub nullable: bool,
    /// The database supplies a value when none is given on insert
    pub has_default: bool,
    pub reference: Option<Reference>,
}

impl Column {
    /// A visible, editable, required column stored under its property name
    pub const fn new(header: &'static str, property: &'static str, kind: ColumnKind) -> Self {
        Self {
            header,
            property,
            field: Some(property),
            kind,
            visible: true,
            is_id: false,
            composite_key: false,
            editable: true,
            creation_editable: true,
            visible_in_edit: true,
            nullable: false,
            has_default: false,
            reference: None,
        }
    }

    /// Auto-generated primary key
    pub const fn id(mut self) -> Self {
        self.is_id = true;
        self.editable = false;
        self.creation_editable = false;
        self.visible_in_edit = false;
        self.has_default = true;
        self
    }

    /// Part of a composite primary key: set on creation, never updated
    pub const fn key(mut self) -> Self {
        self.composite_key = true;
        self.editable = false;
        self
    }

    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn defaulted(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Store the value under a different column than the displayed property
    pub const fn field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// Derived in the select; never written
    pub const fn computed(mut self) -> Self {
        self.field = None;
        self.editable = false;
        self.creation_editable = false;
        self.visible_in_edit = false;
        self
    }

    pub const fn references(
        mut self,
        table: &'static str,
        id_property: &'static str,
        display_property: &'static str,
    ) -> Self {
        self.reference = Some(Reference {
            table,
            id_property,
            display_property,
        });
        self
    }

    /// Kind of the stored value: reference columns store the referenced id
    pub fn field_kind(&self) -> ColumnKind {
        if self.reference.is_some() {
            ColumnKind::Integer
        } else {
            self.kind
        }
    }

    pub fn is_key(&self) -> bool {
        self.is_id || self.composite_key
    }

    /// Optional on insert: nullable, defaulted, or never written
    pub fn is_required(&self) -> bool {
        self.field.is_some() && !self.nullable && !self.has_default
    }

    /// Whether `name` refers to this column by header, property or field
    pub fn matches(&self, name: &str) -> bool {
        self.header.eq_ignore_ascii_case(name)
            || self.property.eq_ignore_ascii_case(name)
            || self.field.is_some_and(|f| f.eq_ignore_ascii_case(name))
    }
}

/// Query, display and edit metadata for one entity
#[derive(Debug)]
pub struct TableDefinition {
    /// Command-line name, e.g. `supplier-categories`
    pub name: &'static str,
    pub display_name: &'static str,
    /// Underlying SQL table
    pub table: &'static str,
    /// Projection joining referenced tables; exposes every property and key field
    pub select: &'static str,
    /// ORDER BY clause over the select's columns
    pub order_by: &'static str,
    pub columns: &'static [Column],
}

impl TableDefinition {
    /// Lookup by header or property, case-insensitive
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.header.eq_ignore_ascii_case(name) || c.property.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::unknown_column(name, self.name))
    }

    /// Lookup by header, property or storage field
    pub fn column_for_input(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.matches(name))
            .ok_or_else(|| StoreError::unknown_column(name, self.name))
    }

    /// Columns identifying a record.
    ///
    /// Flagged key columns win; otherwise every column whose property ends
    /// in `_id` is taken.
    pub fn key_columns(&self) -> Vec<&Column> {
        let flagged: Vec<&Column> = self.columns.iter().filter(|c| c.is_key()).collect();
        if !flagged.is_empty() {
            return flagged;
        }
        self.columns
            .iter()
            .filter(|c| c.property.ends_with("_id"))
            .collect()
    }

    /// Whether records are identified by more than one value
    pub fn has_composite_key(&self) -> bool {
        let keys = self.key_columns();
        keys.len() > 1 || keys.iter().any(|c| c.composite_key)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn edit_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.visible_in_edit && c.editable && c.field.is_some())
    }

    pub fn creation_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.creation_editable && c.field.is_some())
    }
}

/// Every table, in display order
pub fn tables() -> &'static [TableDefinition] {
    TABLES
}

/// Display name to command-line name
pub fn available_tables() -> Vec<(&'static str, &'static str)> {
    TABLES.iter().map(|t| (t.display_name, t.name)).collect()
}

/// Lookup by name, display name or SQL table, case-insensitive
pub fn find(name: &str) -> Result<&'static TableDefinition> {
    let needle = name.trim();
    TABLES
        .iter()
        .find(|t| {
            t.name.eq_ignore_ascii_case(needle)
                || t.display_name.eq_ignore_ascii_case(needle)
                || t.table.eq_ignore_ascii_case(needle)
        })
        .ok_or_else(|| StoreError::UnknownTable {
            name: name.to_string(),
        })
}

pub fn columns(name: &str) -> Result<&'static [Column]> {
    Ok(find(name)?.columns)
}
