//! Report query library
//!
//! A fixed catalog of analytical queries. Each report has one or more
//! variations; a variation is a parameterised SQL query whose parameters
//! are entered as text, dates, or a choice from a registry table.

mod catalog;

pub use catalog::REPORTS;

use rusqlite::ToSql;

use crate::core::{ColumnKind, Result, StoreError, Value};
use crate::crud::{self, ReferenceOption};
use crate::store::{QueryResult, Store};

/// Rows produced by running a report variation
pub type ReportResult = QueryResult;

/// How a parameter value is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamInput {
    Text,
    Date,
    /// Picked from the rows of a registry table
    Choice {
        table: &'static str,
        id_property: &'static str,
        display_property: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ReportParam {
    /// Bound as `:name` in the variation's SQL
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub input: ParamInput,
}

impl ReportParam {
    pub const fn text(name: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            label,
            kind,
            input: ParamInput::Text,
        }
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ColumnKind::Date,
            input: ParamInput::Date,
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        table: &'static str,
        id_property: &'static str,
        display_property: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: ColumnKind::Integer,
            input: ParamInput::Choice {
                table,
                id_property,
                display_property,
            },
        }
    }
}

#[derive(Debug)]
pub struct ReportVariation {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
    pub params: &'static [ReportParam],
}

#[derive(Debug)]
pub struct ReportDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub variations: &'static [ReportVariation],
}

impl ReportDefinition {
    /// Variation by name; the first one when `name` is `None`
    pub fn variation(&self, name: Option<&str>) -> Result<&ReportVariation> {
        match name {
            None => self.variations.first().ok_or_else(|| StoreError::UnknownVariation {
                report: self.name.to_string(),
                name: String::new(),
            }),
            Some(name) => self
                .variations
                .iter()
                .find(|v| v.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| StoreError::UnknownVariation {
                    report: self.name.to_string(),
                    name: name.to_string(),
                }),
        }
    }
}

/// Every report, in menu order
pub fn reports() -> &'static [ReportDefinition] {
    REPORTS
}

pub fn find_report(name: &str) -> Result<&'static ReportDefinition> {
    REPORTS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| StoreError::UnknownReport {
            name: name.to_string(),
        })
}

/// Run a variation with `name=value` arguments.
///
/// Every parameter must be supplied. Values are parsed by the parameter
/// kind; choice parameters also accept the display text of an entry.
pub fn run(
    store: &Store,
    variation: &ReportVariation,
    args: &[(String, String)],
) -> Result<ReportResult> {
    for (name, _) in args {
        if !variation
            .params
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            tracing::warn!(param = %name, variation = variation.name, "ignoring unknown parameter");
        }
    }

    let mut bound: Vec<(String, Value)> = Vec::with_capacity(variation.params.len());
    for param in variation.params {
        let raw = args
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(param.name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| StoreError::MissingParameter {
                name: param.name.to_string(),
                label: param.label.to_string(),
            })?;

        let value = parse_param(store, param, raw)?;
        bound.push((format!(":{}", param.name), value));
    }

    let named: Vec<(&str, &dyn ToSql)> = bound
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect();

    let result = store.query(variation.sql, named.as_slice())?;
    tracing::debug!(variation = variation.name, rows = result.len(), "ran report");
    Ok(result)
}

fn parse_param(store: &Store, param: &ReportParam, raw: &str) -> Result<Value> {
    match Value::parse(param.kind, raw) {
        Ok(value) => Ok(value),
        Err(expected) => {
            if matches!(param.input, ParamInput::Choice { .. }) {
                let wanted = raw.trim();
                if let Some(option) = choices(store, param)?
                    .into_iter()
                    .find(|o| o.label.eq_ignore_ascii_case(wanted))
                {
                    return Ok(option.id);
                }
            }
            Err(StoreError::InvalidValue {
                column: param.label.to_string(),
                value: raw.to_string(),
                expected: expected.to_string(),
            })
        }
    }
}

/// Entries a choice parameter can take; empty for other inputs
pub fn choices(store: &Store, param: &ReportParam) -> Result<Vec<ReferenceOption>> {
    let ParamInput::Choice {
        table,
        id_property,
        display_property,
    } = param.input
    else {
        return Ok(Vec::new());
    };

    let def = crate::catalog::find(table)?;
    let data = crud::table_data(store, def)?;
    Ok(data
        .rows
        .iter()
        .map(|row| ReferenceOption {
            id: row.get(id_property).cloned().unwrap_or_default(),
            label: row
                .get(display_property)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            selected: false,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn demo() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();
        store
    }

    fn args(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Plausible argument for any parameter against the demo data
    fn sample(param: &ReportParam) -> &'static str {
        match (param.input, param.name) {
            (ParamInput::Date, "start") => "2024-01-01",
            (ParamInput::Date, "end") => "2024-12-31",
            (ParamInput::Date, _) => "2024-02-15",
            (ParamInput::Choice { .. }, _) => "1",
            (ParamInput::Text, _) => "1",
        }
    }

    fn column(result: &ReportResult, name: &str) -> Vec<String> {
        result
            .rows
            .iter()
            .map(|r| r.get(name).map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_catalog_shape() {
        assert_eq!(reports().len(), 20);
        let mut names = HashSet::new();
        for report in reports() {
            assert!(names.insert(report.name), "duplicate report {}", report.name);
            assert!(!report.variations.is_empty() && report.variations.len() <= 2);
        }
    }

    #[test]
    fn test_every_variation_runs() {
        let store = demo();
        for report in reports() {
            for variation in report.variations {
                let given: Vec<(String, String)> = variation
                    .params
                    .iter()
                    .map(|p| (p.name.to_string(), sample(p).to_string()))
                    .collect();
                let result = run(&store, variation, &given).unwrap_or_else(|e| {
                    panic!("{}/{} failed: {}", report.name, variation.name, e)
                });
                assert!(!result.columns.is_empty());
            }
        }
    }

    #[test]
    fn test_choice_params_have_choices() {
        let store = demo();
        for report in reports() {
            for variation in report.variations {
                for param in variation.params {
                    if let ParamInput::Choice { .. } = param.input {
                        assert!(!choices(&store, param).unwrap().is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_variation_lookup() {
        let report = find_report("supplier-products").unwrap();
        assert_eq!(report.variation(None).unwrap().name, "by-category");
        assert_eq!(report.variation(Some("MIN-VOLUME")).unwrap().name, "min-volume");
        assert!(matches!(
            report.variation(Some("weekly")),
            Err(StoreError::UnknownVariation { .. })
        ));
        assert!(matches!(
            find_report("nope"),
            Err(StoreError::UnknownReport { .. })
        ));
    }

    #[test]
    fn test_suppliers_of_category_delivering_product() {
        let store = demo();
        let report = find_report("supplier-products").unwrap();

        let all = run(
            &store,
            report.variation(None).unwrap(),
            &args(&[("product", "1"), ("category", "1")]),
        )
        .unwrap();
        assert_eq!(column(&all, "Supplier"), vec!["Bosch Parts", "Denso Trade"]);

        let min = run(
            &store,
            report.variation(Some("min-volume")).unwrap(),
            &args(&[
                ("product", "Brake pads"),
                ("category", "Manufacturer"),
                ("min_quantity", "60"),
                ("start", "2024-01-01"),
                ("end", "31.12.2024"),
            ]),
        )
        .unwrap();
        assert_eq!(column(&min, "Supplier"), vec!["Bosch Parts"]);
    }

    #[test]
    fn test_missing_and_invalid_parameters() {
        let store = demo();
        let variation = find_report("supplier-products").unwrap().variation(None).unwrap();

        let err = run(&store, variation, &args(&[("product", "1")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingParameter { ref name, .. } if name == "category"));

        let err = run(&store, variation, &args(&[("product", "Flux capacitor"), ("category", "1")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));
    }

    #[test]
    fn test_cheapest_supplier() {
        let store = demo();
        let variation = find_report("product-suppliers")
            .unwrap()
            .variation(Some("cheapest"))
            .unwrap();
        let result = run(&store, variation, &args(&[("product", "1")])).unwrap();
        assert_eq!(column(&result, "Supplier"), vec!["Denso Trade"]);
    }

    #[test]
    fn test_product_customers_in_period() {
        let store = demo();
        let variation = find_report("product-customers").unwrap().variation(None).unwrap();
        let result = run(
            &store,
            variation,
            &args(&[("product", "1"), ("start", "2024-01-01"), ("end", "2024-12-31")]),
        )
        .unwrap();
        assert_eq!(column(&result, "Quantity"), vec!["10", "2"]);
    }

    #[test]
    fn test_cash_report_for_february() {
        let store = demo();
        let variation = find_report("cash-report").unwrap().variation(None).unwrap();
        let result = run(
            &store,
            variation,
            &args(&[("start", "2024-02-01"), ("end", "2024-02-29")]),
        )
        .unwrap();
        assert_eq!(column(&result, "Sales"), vec!["2"]);
        assert_eq!(column(&result, "Revenue"), vec!["376.75"]);
        assert_eq!(column(&result, "Refunds"), vec!["8.75"]);
        assert_eq!(column(&result, "Net"), vec!["368.00"]);
    }

    #[test]
    fn test_low_stock_and_empty_cells() {
        let store = demo();
        let low = run(
            &store,
            find_report("inventory").unwrap().variation(Some("low-stock")).unwrap(),
            &args(&[("threshold", "50")]),
        )
        .unwrap();
        assert_eq!(column(&low, "Product"), vec!["Air filter", "Timing belt"]);

        let empty = run(
            &store,
            find_report("storage-cells").unwrap().variation(Some("empty")).unwrap(),
            &[],
        )
        .unwrap();
        assert_eq!(column(&empty, "Cell"), vec!["B1"]);
    }

    #[test]
    fn test_top_products_limit() {
        let store = demo();
        let variation = find_report("top-products").unwrap().variation(None).unwrap();
        let result = run(&store, variation, &args(&[("limit", "1")])).unwrap();
        assert_eq!(column(&result, "Product"), vec!["Brake pads"]);
        assert_eq!(column(&result, "Sold"), vec!["12"]);
    }
}
