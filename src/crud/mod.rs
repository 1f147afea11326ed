//! Generic CRUD engine driven by the table registry
//!
//! Every operation takes a [`TableDefinition`] and builds its SQL from the
//! registry metadata: the display select for reads, the storage fields for
//! writes, and the key columns for record lookup.

mod key;
mod predicate;

pub use key::{key_of, parse_key, Key};
pub use predicate::{escape_identifier, Operator, WhereClause};

use rusqlite::params_from_iter;
use serde::Serialize;

use crate::catalog::{self, Column, TableDefinition};
use crate::core::{error::is_foreign_key_violation, Result, StoreError, Value};
use crate::store::{QueryResult, Row, Store};

/// Label of the empty choice offered for nullable references
pub const NOT_SELECTED: &str = "(not selected)";

/// One entry of a reference choice list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceOption {
    /// Referenced id; `Null` for the empty choice
    pub id: Value,
    pub label: String,
    pub selected: bool,
}

/// Every row of the table's display select
pub fn table_data(store: &Store, def: &TableDefinition) -> Result<QueryResult> {
    let result = select_display(store, def, &WhereClause::new())?;
    tracing::debug!(table = def.name, rows = result.len(), "loaded table data");
    Ok(result)
}

/// Rows whose column, in text form, contains `needle`.
///
/// Matching is case-sensitive; null values never match and an empty needle
/// matches every non-null value.
pub fn search(
    store: &Store,
    def: &TableDefinition,
    column: &str,
    needle: &str,
) -> Result<QueryResult> {
    let column = def.column(column)?;
    let filter = WhereClause::new().where_contains(column.property, needle);
    let result = select_display(store, def, &filter)?;
    tracing::debug!(
        table = def.name,
        column = column.property,
        needle,
        rows = result.len(),
        "searched table"
    );
    Ok(result)
}

/// The stored entity with the given single id
pub fn get_by_id(store: &Store, def: &TableDefinition, id: Value) -> Result<Option<Row>> {
    let keys = def.key_columns();
    if def.has_composite_key() {
        return Err(StoreError::invalid_key(
            def.name,
            format!("table has a composite key of {} columns", keys.len()),
        ));
    }
    let field = keys[0].field.unwrap_or(keys[0].property);
    get_by_key(store, def, &Key::single(field, id))
}

/// The stored entity (all columns of the underlying table) for a key
pub fn get_by_key(store: &Store, def: &TableDefinition, key: &Key) -> Result<Option<Row>> {
    let (where_sql, params) = key.where_clause().to_sql(0);
    let sql = format!(
        "SELECT * FROM {}{} LIMIT 1",
        escape_identifier(def.table),
        where_sql
    );
    let row = store.query_one(&sql, params_from_iter(params.iter()))?;
    Ok(row.map(|r| typed_by_field(def, r)))
}

/// The projected row shown in grids for a key
pub fn get_display_row(store: &Store, def: &TableDefinition, key: &Key) -> Result<Option<Row>> {
    Ok(select_display(store, def, &key.where_clause())?
        .rows
        .into_iter()
        .next())
}

/// Apply named changes to a record.
///
/// Columns may be named by header, property or field. Key columns are
/// skipped; computed and non-editable columns are rejected. Returns the
/// number of rows changed.
pub fn update(
    store: &Store,
    def: &TableDefinition,
    key: &Key,
    changes: &[(String, String)],
) -> Result<usize> {
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    for (name, raw) in changes {
        let column = def.column_for_input(name)?;
        if column.is_key() {
            tracing::warn!(table = def.name, column = column.header, "key columns are not updated");
            continue;
        }
        let field = match column.field {
            Some(field) if column.editable => field,
            _ => {
                return Err(StoreError::ReadOnlyColumn {
                    column: column.header.to_string(),
                    table: def.name.to_string(),
                })
            }
        };

        values.push(parse_input(column, raw)?);
        assignments.push(format!("{} = ?{}", escape_identifier(field), values.len()));
    }

    if assignments.is_empty() {
        return match get_by_key(store, def, key)? {
            Some(_) => Ok(0),
            None => Err(StoreError::not_found(def.name)),
        };
    }

    let (where_sql, key_params) = key.where_clause().to_sql(values.len());
    values.extend(key_params);
    let sql = format!(
        "UPDATE {} SET {}{}",
        escape_identifier(def.table),
        assignments.join(", "),
        where_sql
    );

    let changed = store.execute(&sql, params_from_iter(values.iter()))?;
    if changed == 0 {
        return Err(StoreError::not_found(def.name));
    }
    tracing::info!(table = def.name, key = %key, "updated record");
    Ok(changed)
}

/// Delete a record
pub fn delete(store: &Store, def: &TableDefinition, key: &Key) -> Result<()> {
    let (where_sql, params) = key.where_clause().to_sql(0);
    let sql = format!("DELETE FROM {}{}", escape_identifier(def.table), where_sql);

    let deleted = store
        .execute(&sql, params_from_iter(params.iter()))
        .map_err(|e| match e {
            StoreError::Database(ref inner) if is_foreign_key_violation(inner) => {
                StoreError::InUse {
                    table: def.name.to_string(),
                }
            }
            other => other,
        })?;

    if deleted == 0 {
        return Err(StoreError::not_found(def.name));
    }
    tracing::info!(table = def.name, key = %key, "deleted record");
    Ok(())
}

/// Insert a record from named values, returning its key.
///
/// Only creation-editable columns may be given; blank values fall back to
/// the column's default or NULL.
pub fn insert(store: &Store, def: &TableDefinition, values: &[(String, String)]) -> Result<Key> {
    let mut provided: Vec<(&Column, Value)> = Vec::new();

    for (name, raw) in values {
        let column = def.column_for_input(name)?;
        if !column.creation_editable || column.field.is_none() {
            return Err(StoreError::ReadOnlyColumn {
                column: column.header.to_string(),
                table: def.name.to_string(),
            });
        }

        let value = parse_new_input(column, raw)?;
        provided.retain(|(c, _)| c.property != column.property);
        if !value.is_null() {
            provided.push((column, value));
        }
    }

    for column in def.creation_columns().filter(|c| c.is_required()) {
        if !provided.iter().any(|(c, _)| c.property == column.property) {
            return Err(StoreError::MissingField {
                column: column.header.to_string(),
            });
        }
    }

    let table = escape_identifier(def.table);
    let sql = if provided.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", table)
    } else {
        let fields: Vec<String> = provided
            .iter()
            .filter_map(|(c, _)| c.field.map(escape_identifier))
            .collect();
        let placeholders: Vec<String> = (1..=provided.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            fields.join(", "),
            placeholders.join(", ")
        )
    };

    let rowid = store.insert(&sql, params_from_iter(provided.iter().map(|(_, v)| v)))?;

    let mut parts = Vec::new();
    for column in def.key_columns() {
        let field = column.field.unwrap_or(column.property);
        let value = provided
            .iter()
            .find(|(c, _)| c.property == column.property)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Integer(rowid));
        parts.push((field, value));
    }
    let key = Key::from_parts(parts);

    tracing::info!(table = def.name, key = %key, "inserted record");
    Ok(key)
}

/// Choice list for a reference column.
///
/// Nullable columns get a leading empty choice. The entry matching
/// `current` is marked selected.
pub fn reference_options(
    store: &Store,
    def: &TableDefinition,
    column: &str,
    current: Option<&Value>,
) -> Result<Vec<ReferenceOption>> {
    let column = def.column_for_input(column)?;
    let reference = column.reference.ok_or_else(|| StoreError::NotAReference {
        column: column.header.to_string(),
        table: def.name.to_string(),
    })?;

    let target = catalog::find(reference.table)?;
    let data = table_data(store, target)?;
    let current = current.filter(|v| !v.is_null());

    let mut options = Vec::with_capacity(data.len() + 1);
    if column.nullable {
        options.push(ReferenceOption {
            id: Value::Null,
            label: NOT_SELECTED.to_string(),
            selected: current.is_none(),
        });
    }

    for row in &data.rows {
        let id = row.get(reference.id_property).cloned().unwrap_or_default();
        let label = row
            .get(reference.display_property)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let selected = match (current, id.as_i64()) {
            (Some(cur), Some(id)) => cur.as_i64() == Some(id),
            (Some(cur), None) => *cur == id,
            (None, _) => false,
        };
        options.push(ReferenceOption {
            id,
            label,
            selected,
        });
    }

    Ok(options)
}

/// Parse raw input for an existing record's column.
///
/// Blanks are refused for every non-nullable column: a column default only
/// applies when a row is inserted.
pub fn parse_input(column: &Column, raw: &str) -> Result<Value> {
    let value = parse_value(column, raw)?;
    if value.is_null() && !column.nullable {
        return Err(StoreError::MissingField {
            column: column.header.to_string(),
        });
    }
    Ok(value)
}

/// Parse raw input for a new record's column; blanks are accepted where the
/// database supplies a default.
pub fn parse_new_input(column: &Column, raw: &str) -> Result<Value> {
    let value = parse_value(column, raw)?;
    if value.is_null() && column.is_required() {
        return Err(StoreError::MissingField {
            column: column.header.to_string(),
        });
    }
    Ok(value)
}

fn parse_value(column: &Column, raw: &str) -> Result<Value> {
    Value::parse(column.field_kind(), raw).map_err(|expected| StoreError::InvalidValue {
        column: column.header.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    })
}

fn select_display(store: &Store, def: &TableDefinition, filter: &WhereClause) -> Result<QueryResult> {
    let (where_sql, params) = filter.to_sql(0);
    let sql = format!(
        "SELECT * FROM ({}) AS t{} ORDER BY {}",
        def.select, where_sql, def.order_by
    );
    let mut result = store.query(&sql, params_from_iter(params.iter()))?;
    result.rows = result
        .rows
        .into_iter()
        .map(|row| typed_by_property(def, row))
        .collect();
    Ok(result)
}

fn typed_by_property(def: &TableDefinition, row: Row) -> Row {
    retype(row, |name| {
        def.columns
            .iter()
            .find(|c| c.property.eq_ignore_ascii_case(name))
            .map(|c| c.kind)
    })
}

fn typed_by_field(def: &TableDefinition, row: Row) -> Row {
    retype(row, |name| {
        def.columns
            .iter()
            .find(|c| c.field.is_some_and(|f| f.eq_ignore_ascii_case(name)))
            .map(|c| c.field_kind())
    })
}

fn retype(row: Row, kind_of: impl Fn(&str) -> Option<crate::core::ColumnKind>) -> Row {
    let mut typed = Row::with_capacity(row.len());
    for (name, value) in row.iter() {
        let value = match kind_of(name) {
            Some(kind) => value.clone().coerce(kind),
            None => value.clone(),
        };
        typed.push(name, value);
    }
    typed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();
        store
    }

    fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names(result: &QueryResult, column: &str) -> Vec<String> {
        result
            .rows
            .iter()
            .map(|r| r.get(column).map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_table_data_is_ordered_and_typed() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let data = table_data(&store, products).unwrap();

        assert_eq!(data.len(), 5);
        assert_eq!(data.rows[0].get("product_name"), Some(&Value::from("Brake pads")));
        assert_eq!(data.rows[1].get("product_sale_price"), Some(&Value::Real(12.0)));

        let suppliers = table_data(&store, catalog::find("suppliers").unwrap()).unwrap();
        assert_eq!(suppliers.rows[3].get("is_active"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_search_contains() {
        let store = demo();
        let products = catalog::find("products").unwrap();

        let found = search(&store, products, "Name", "filter").unwrap();
        assert_eq!(names(&found, "product_name"), vec!["Oil filter", "Air filter"]);

        // case-sensitive
        assert!(search(&store, products, "Name", "FILTER").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_needle_skips_nulls() {
        let store = demo();
        let products = catalog::find("products").unwrap();

        assert_eq!(search(&store, products, "product_name", "").unwrap().len(), 5);
        assert_eq!(search(&store, products, "Description", "").unwrap().len(), 3);
    }

    #[test]
    fn test_search_bools_and_decimals_by_text_form() {
        let store = demo();

        let inactive = search(&store, catalog::find("suppliers").unwrap(), "Active", "0").unwrap();
        assert_eq!(names(&inactive, "supplier_name"), vec!["Garage Works"]);

        let sales = search(&store, catalog::find("sales").unwrap(), "Total", "225.75").unwrap();
        assert_eq!(sales.len(), 1);
    }

    #[test]
    fn test_search_unknown_column() {
        let store = demo();
        let err = search(&store, catalog::find("products").unwrap(), "Colour", "red").unwrap_err();
        assert_eq!(err.to_string(), "Column 'Colour' not found in table 'products'");
    }

    #[test]
    fn test_get_by_id_and_key() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let row = get_by_id(&store, products, Value::Integer(2)).unwrap().unwrap();
        assert_eq!(row.get("product_name"), Some(&Value::from("Oil filter")));
        assert!(get_by_id(&store, products, Value::Integer(99)).unwrap().is_none());

        let terms = catalog::find("delivery-terms").unwrap();
        let key = parse_key(terms, &["2".to_string(), "1".to_string()]).unwrap();
        let row = get_by_key(&store, terms, &key).unwrap().unwrap();
        assert_eq!(row.get("delivery_price"), Some(&Value::Real(28.0)));

        assert!(get_by_id(&store, terms, Value::Integer(1)).is_err());
    }

    #[test]
    fn test_display_row_round_trips_key() {
        let store = demo();
        let terms = catalog::find("delivery-terms").unwrap();
        let key = parse_key(terms, &["1".to_string(), "3".to_string()]).unwrap();

        let row = get_display_row(&store, terms, &key).unwrap().unwrap();
        assert_eq!(row.get("supplier_name"), Some(&Value::from("Bosch Parts")));
        assert_eq!(row.get("product_name"), Some(&Value::from("Spark plug")));
        assert_eq!(key_of(terms, &row).unwrap(), key);
    }

    #[test]
    fn test_update_parses_values() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let key = Key::single("product_id", Value::Integer(2));

        let changed = update(&store, products, &key, &set(&[("Sale price", "13,40")])).unwrap();
        assert_eq!(changed, 1);
        let row = get_by_key(&store, products, &key).unwrap().unwrap();
        assert_eq!(row.get("product_sale_price"), Some(&Value::Real(13.4)));
    }

    #[test]
    fn test_update_skips_keys_and_rejects_read_only() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let key = Key::single("product_id", Value::Integer(2));
        assert_eq!(update(&store, products, &key, &set(&[("product_id", "7")])).unwrap(), 0);

        let sales = catalog::find("sales").unwrap();
        let err = update(
            &store,
            sales,
            &Key::single("sale_id", Value::Integer(1)),
            &set(&[("Total", "1")]),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::ReadOnlyColumn { .. }));
    }

    #[test]
    fn test_update_missing_record() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let missing = Key::single("product_id", Value::Integer(99));

        let err = update(&store, products, &missing, &set(&[("Name", "Ghost")])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        let err = update(&store, products, &missing, &[]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_update_required_value_cannot_be_blank() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let key = Key::single("product_id", Value::Integer(1));
        let err = update(&store, products, &key, &set(&[("Name", " ")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingField { .. }));
    }

    #[test]
    fn test_update_defaulted_value_cannot_be_blank() {
        let store = demo();
        let sales = catalog::find("sales").unwrap();
        let key = Key::single("sale_id", Value::Integer(1));
        let err = update(&store, sales, &key, &set(&[("Sale date", "")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingField { ref column } if column == "Sale date"));

        let column = sales.column("Sale date").unwrap();
        assert_eq!(parse_new_input(column, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_delete_in_use_and_missing() {
        let store = demo();
        let products = catalog::find("products").unwrap();
        let err = delete(&store, products, &Key::single("product_id", Value::Integer(1))).unwrap_err();
        assert!(matches!(err, StoreError::InUse { .. }));

        let returns = catalog::find("supplier-returns").unwrap();
        let key = Key::single("supplier_return_id", Value::Integer(1));
        delete(&store, returns, &key).unwrap();
        assert!(matches!(
            delete(&store, returns, &key),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_insert_with_generated_id() {
        let store = demo();
        let products = catalog::find("products").unwrap();

        let key = insert(&store, products, &set(&[("Name", "Wiper blade"), ("Sale price", "9.99")])).unwrap();
        assert_eq!(key, Key::single("product_id", Value::Integer(6)));

        let err = insert(&store, products, &set(&[("Name", "No price")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingField { ref column } if column == "Sale price"));
    }

    #[test]
    fn test_insert_composite_and_defaults() {
        let store = demo();
        let terms = catalog::find("delivery-terms").unwrap();
        let key = insert(
            &store,
            terms,
            &set(&[
                ("Supplier", "3"),
                ("Product", "1"),
                ("Delivery price", "29"),
                ("Delivery days", "4"),
            ]),
        )
        .unwrap();
        assert_eq!(key.to_args(), "3 1");

        let sales = catalog::find("sales").unwrap();
        let key = insert(&store, sales, &set(&[("Customer", "2"), ("Employee", "1")])).unwrap();
        let row = get_display_row(&store, sales, &key).unwrap().unwrap();
        assert!(matches!(row.get("sale_date"), Some(Value::DateTime(_))));
        assert_eq!(row.get("is_order_fulfillment"), Some(&Value::Bool(false)));
        assert_eq!(row.get("sale_total_amount"), Some(&Value::Real(0.0)));
    }

    #[test]
    fn test_insert_rejects_computed_columns() {
        let store = demo();
        let sales = catalog::find("sales").unwrap();
        let err = insert(&store, sales, &set(&[("Total", "10")])).unwrap_err();
        assert!(matches!(err, StoreError::ReadOnlyColumn { .. }));
    }

    #[test]
    fn test_reference_options_marks_current() {
        let store = demo();
        let suppliers = catalog::find("suppliers").unwrap();
        let options =
            reference_options(&store, suppliers, "Category", Some(&Value::Integer(2))).unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options[1].label, "Dealer");
        assert!(options[1].selected);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn test_reference_options_nullable_column() {
        let store = demo();
        let sales = catalog::find("sales").unwrap();
        let options = reference_options(&store, sales, "Customer order", None).unwrap();

        assert_eq!(options[0].label, NOT_SELECTED);
        assert!(options[0].selected);
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn test_reference_options_requires_reference() {
        let store = demo();
        let err = reference_options(&store, catalog::find("products").unwrap(), "Name", None)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotAReference { .. }));
    }
}
