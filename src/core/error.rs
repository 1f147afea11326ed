//! Error types for the store, registry, CRUD engine and report library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by database access and the metadata-driven operations on top of it
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to open database at {path}: {source}")]
    #[diagnostic(
        code(autoparts::store::open),
        help("check that the directory is writable, or pass --database <path>")
    )]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database query failed: {0}")]
    #[diagnostic(code(autoparts::store::query))]
    Database(#[from] rusqlite::Error),

    #[error("database schema version {found} does not match the expected version {expected}")]
    #[diagnostic(
        code(autoparts::store::schema),
        help("the database was created by a different release; export the data and re-run `autoparts init --force`")
    )]
    SchemaMismatch { found: i32, expected: i32 },

    #[error("database lock poisoned by a panicked call")]
    #[diagnostic(code(autoparts::store::lock))]
    LockPoisoned,

    #[error("database already contains data; demo data is only loaded into an empty store")]
    #[diagnostic(code(autoparts::store::not_empty))]
    NotEmpty,

    #[error("unknown table '{name}'")]
    #[diagnostic(
        code(autoparts::catalog::table),
        help("run `autoparts tables` to list the available tables")
    )]
    UnknownTable { name: String },

    #[error("Column '{column}' not found in table '{table}'")]
    #[diagnostic(
        code(autoparts::catalog::column),
        help("run `autoparts table columns {table}` to list its columns")
    )]
    UnknownColumn { column: String, table: String },

    #[error("column '{column}' of table '{table}' does not reference another table")]
    #[diagnostic(code(autoparts::catalog::reference))]
    NotAReference { column: String, table: String },

    #[error("column '{column}' of table '{table}' cannot be edited")]
    #[diagnostic(code(autoparts::crud::read_only))]
    ReadOnlyColumn { column: String, table: String },

    #[error("invalid value '{value}' for '{column}': expected {expected}")]
    #[diagnostic(code(autoparts::crud::value))]
    InvalidValue {
        column: String,
        value: String,
        expected: String,
    },

    #[error("a value for '{column}' is required")]
    #[diagnostic(code(autoparts::crud::missing_field))]
    MissingField { column: String },

    #[error("invalid key for table '{table}': {message}")]
    #[diagnostic(
        code(autoparts::crud::key),
        help("pass key values in key column order, or as field=value pairs")
    )]
    InvalidKey { table: String, message: String },

    #[error("row of table '{table}' has no value for key column '{column}'")]
    #[diagnostic(code(autoparts::crud::missing_key))]
    MissingKey { table: String, column: String },

    #[error("record not found in table '{table}'")]
    #[diagnostic(code(autoparts::crud::not_found))]
    NotFound { table: String },

    #[error("cannot delete the record from '{table}': it is used in other tables")]
    #[diagnostic(
        code(autoparts::crud::in_use),
        help("delete or re-point the dependent records first")
    )]
    InUse { table: String },

    #[error("unknown report '{name}'")]
    #[diagnostic(
        code(autoparts::reports::unknown),
        help("run `autoparts report list` to see the available reports")
    )]
    UnknownReport { name: String },

    #[error("report '{report}' has no variation '{name}'")]
    #[diagnostic(code(autoparts::reports::variation))]
    UnknownVariation { report: String, name: String },

    #[error("missing parameter '{name}' ({label})")]
    #[diagnostic(
        code(autoparts::reports::parameter),
        help("pass it as --param {name}=<value>")
    )]
    MissingParameter { name: String, label: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(autoparts::io))]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn unknown_column(column: impl Into<String>, table: &str) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            table: table.to_string(),
        }
    }

    pub(crate) fn invalid_key(table: &str, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(table: &str) -> Self {
        Self::NotFound {
            table: table.to_string(),
        }
    }
}

/// Whether a rusqlite error is a violated foreign key constraint
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_message() {
        let err = StoreError::unknown_column("Colour", "products");
        assert_eq!(
            err.to_string(),
            "Column 'Colour' not found in table 'products'"
        );
    }

    #[test]
    fn test_in_use_message() {
        let err = StoreError::InUse {
            table: "products".to_string(),
        };
        assert!(err.to_string().contains("used in other tables"));
    }

    #[test]
    fn test_foreign_key_detection_ignores_other_errors() {
        assert!(!is_foreign_key_violation(&rusqlite::Error::QueryReturnedNoRows));
    }
}
