//! Record keys: single ids and composite keys

use std::fmt;

use serde::Serialize;

use super::predicate::WhereClause;
use crate::catalog::TableDefinition;
use crate::core::{Result, StoreError, Value};
use crate::store::Row;

/// Values identifying one record, by storage field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Key {
    parts: Vec<(&'static str, Value)>,
}

impl Key {
    pub fn single(field: &'static str, value: Value) -> Self {
        Self {
            parts: vec![(field, value)],
        }
    }

    pub(crate) fn from_parts(parts: Vec<(&'static str, Value)>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[(&'static str, Value)] {
        &self.parts
    }

    pub fn is_composite(&self) -> bool {
        self.parts.len() > 1
    }

    pub(crate) fn where_clause(&self) -> WhereClause {
        self.parts
            .iter()
            .fold(WhereClause::new(), |w, (field, value)| w.where_eq(field, value.clone()))
    }

    /// Values only, space separated, as accepted back by `parse_key`
    pub fn to_args(&self) -> String {
        self.parts
            .iter()
            .map(|(_, v)| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .parts
            .iter()
            .map(|(field, v)| format!("{}={}", field, v))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Extract the key of a displayed row.
///
/// A single key column is read under its property; composite keys are read
/// from each key column's storage field.
pub fn key_of(def: &TableDefinition, row: &Row) -> Result<Key> {
    let composite = def.has_composite_key();
    let mut parts = Vec::new();

    for column in def.key_columns() {
        let field = column.field.unwrap_or(column.property);
        let name = if composite { field } else { column.property };
        let value = row
            .get(name)
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| StoreError::MissingKey {
                table: def.name.to_string(),
                column: name.to_string(),
            })?;
        parts.push((field, value));
    }

    Ok(Key { parts })
}

/// Build a key from command-line input: values in key column order, or
/// `name=value` pairs naming key columns by header, property or field.
pub fn parse_key(def: &TableDefinition, args: &[String]) -> Result<Key> {
    let columns = def.key_columns();
    if args.len() != columns.len() {
        let names: Vec<_> = columns.iter().map(|c| c.field.unwrap_or(c.property)).collect();
        return Err(StoreError::invalid_key(
            def.name,
            format!("expected {} value(s): {}", columns.len(), names.join(", ")),
        ));
    }

    let named = args.iter().all(|a| a.contains('='));
    let mut parts = Vec::with_capacity(columns.len());

    for (i, column) in columns.iter().enumerate() {
        let raw = if named {
            args.iter()
                .filter_map(|a| a.split_once('='))
                .find(|(name, _)| column.matches(name.trim()))
                .map(|(_, v)| v)
                .ok_or_else(|| {
                    StoreError::invalid_key(def.name, format!("no value for '{}'", column.header))
                })?
        } else {
            args[i].as_str()
        };

        let field = column.field.unwrap_or(column.property);
        let value = Value::parse(column.field_kind(), raw).map_err(|expected| {
            StoreError::InvalidValue {
                column: column.header.to_string(),
                value: raw.to_string(),
                expected: expected.to_string(),
            }
        })?;
        if value.is_null() {
            return Err(StoreError::invalid_key(
                def.name,
                format!("'{}' cannot be empty", column.header),
            ));
        }
        parts.push((field, value));
    }

    Ok(Key { parts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_parse_single_key() {
        let def = catalog::find("products").unwrap();
        let key = parse_key(def, &["3".to_string()]).unwrap();
        assert_eq!(key, Key::single("product_id", Value::Integer(3)));
        assert!(!key.is_composite());
    }

    #[test]
    fn test_parse_composite_key_positional_and_named() {
        let def = catalog::find("delivery-terms").unwrap();
        let positional = parse_key(def, &["1".to_string(), "3".to_string()]).unwrap();
        let named = parse_key(
            def,
            &["dt_product_id=3".to_string(), "Supplier=1".to_string()],
        )
        .unwrap();
        assert_eq!(positional, named);
        assert_eq!(positional.to_string(), "dt_supplier_id=1, dt_product_id=3");
        assert_eq!(positional.to_args(), "1 3");
    }

    #[test]
    fn test_parse_key_errors() {
        let def = catalog::find("delivery-terms").unwrap();
        assert!(matches!(
            parse_key(def, &["1".to_string()]),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            parse_key(def, &["x".to_string(), "1".to_string()]),
            Err(StoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_key_of_composite_reads_fields() {
        let def = catalog::find("delivery-terms").unwrap();
        let mut row = Row::default();
        row.push("dt_supplier_id", Value::Integer(2));
        row.push("supplier_name", Value::from("Denso Trade"));
        row.push("dt_product_id", Value::Integer(1));
        row.push("product_name", Value::from("Brake pads"));

        let key = key_of(def, &row).unwrap();
        assert_eq!(
            key.parts(),
            &[
                ("dt_supplier_id", Value::Integer(2)),
                ("dt_product_id", Value::Integer(1))
            ]
        );
    }

    #[test]
    fn test_key_of_missing_value() {
        let def = catalog::find("products").unwrap();
        let mut row = Row::default();
        row.push("product_id", Value::Null);
        assert!(matches!(
            key_of(def, &row),
            Err(StoreError::MissingKey { .. })
        ));
    }
}
