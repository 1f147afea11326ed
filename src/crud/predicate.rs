//! Dynamic WHERE clause construction

use crate::core::Value;

/// Comparison applied by one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    /// Text form of the column contains the value (case-sensitive)
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

/// Conjunction of conditions, rendered with positional parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    conditions: Vec<Condition>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, column: &str, value: Value) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            operator: Operator::Equal,
            value,
        });
        self
    }

    pub fn where_contains(mut self, column: &str, needle: &str) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            operator: Operator::Contains,
            value: Value::Text(needle.to_string()),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render as ` WHERE ...` with `?N` placeholders numbered after `offset`
    /// existing parameters. Returns the SQL and the values to bind.
    pub fn to_sql(&self, offset: usize) -> (String, Vec<Value>) {
        if self.conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut params = Vec::with_capacity(self.conditions.len());
        let parts: Vec<String> = self
            .conditions
            .iter()
            .enumerate()
            .map(|(i, cond)| {
                let placeholder = format!("?{}", offset + i + 1);
                let column = escape_identifier(&cond.column);
                params.push(cond.value.clone());
                match cond.operator {
                    Operator::Equal => format!("{} = {}", column, placeholder),
                    Operator::Contains => {
                        format!("instr(CAST({} AS TEXT), {}) > 0", column, placeholder)
                    }
                }
            })
            .collect();

        (format!(" WHERE {}", parts.join(" AND ")), params)
    }
}

/// Quote an identifier, doubling embedded quotes
pub fn escape_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clause_renders_nothing() {
        let (sql, params) = WhereClause::new().to_sql(0);
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_conditions_are_joined_and_numbered() {
        let (sql, params) = WhereClause::new()
            .where_eq("dt_supplier_id", Value::Integer(1))
            .where_eq("dt_product_id", Value::Integer(3))
            .to_sql(1);
        assert_eq!(sql, r#" WHERE "dt_supplier_id" = ?2 AND "dt_product_id" = ?3"#);
        assert_eq!(params, vec![Value::Integer(1), Value::Integer(3)]);
    }

    #[test]
    fn test_contains_casts_to_text() {
        let (sql, _) = WhereClause::new().where_contains("is_active", "1").to_sql(0);
        assert_eq!(sql, r#" WHERE instr(CAST("is_active" AS TEXT), ?1) > 0"#);
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("name"), "\"name\"");
        assert_eq!(escape_identifier("bad\"name"), "\"bad\"\"name\"");
    }
}
