//! Typed cell values exchanged with the database

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The kind of data a column or report parameter holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
    Bool,
    Date,
    DateTime,
}

impl ColumnKind {
    /// Human description used in parse errors
    pub fn expected(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "a whole number",
            ColumnKind::Decimal => "a number",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "yes/no, true/false or 1/0",
            ColumnKind::Date => "a date (YYYY-MM-DD or DD.MM.YYYY)",
            ColumnKind::DateTime => "a date and time (YYYY-MM-DD HH:MM[:SS])",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "bool",
            ColumnKind::Date => "date",
            ColumnKind::DateTime => "datetime",
        };
        write!(f, "{}", s)
    }
}

/// A single database value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Parse user input for a column of the given kind.
    ///
    /// Blank input parses to `Null`; whether that is acceptable is the
    /// caller's decision. On failure the expected format is returned.
    pub fn parse(kind: ColumnKind, input: &str) -> Result<Value, &'static str> {
        let raw = input.trim();
        if raw.is_empty() {
            return Ok(Value::Null);
        }

        match kind {
            ColumnKind::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| kind.expected()),
            ColumnKind::Decimal => raw
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Real)
                .ok_or(kind.expected()),
            ColumnKind::Text => Ok(Value::Text(input.to_string())),
            ColumnKind::Bool => match raw.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
                _ => Err(kind.expected()),
            },
            ColumnKind::Date => parse_date(raw).map(Value::Date).ok_or(kind.expected()),
            ColumnKind::DateTime => parse_datetime(raw)
                .map(Value::DateTime)
                .ok_or(kind.expected()),
        }
    }

    /// Reinterpret a raw storage value according to a column kind.
    ///
    /// SQLite hands booleans back as integers and dates as text; values that
    /// do not fit the kind are returned unchanged.
    pub fn coerce(self, kind: ColumnKind) -> Value {
        match (kind, self) {
            (ColumnKind::Bool, Value::Integer(i)) => Value::Bool(i != 0),
            (ColumnKind::Decimal, Value::Integer(i)) => Value::Real(i as f64),
            (ColumnKind::Date, Value::Text(s)) => match parse_date(&s) {
                Some(d) => Value::Date(d),
                None => Value::Text(s),
            },
            (ColumnKind::DateTime, Value::Text(s)) => match parse_datetime(&s) {
                Some(dt) => Value::DateTime(dt),
                None => Value::Text(s),
            },
            (_, v) => v,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        DATETIME_FORMAT,
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:.2}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<rusqlite::types::Value> for Value {
    fn from(v: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value as Sql;
        match v {
            Sql::Null => Value::Null,
            Sql::Integer(i) => Value::Integer(i),
            Sql::Real(r) => Value::Real(r),
            Sql::Text(s) => Value::Text(s),
            Sql::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(r) => ToSqlOutput::from(*r),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Bool(b) => ToSqlOutput::from(*b),
            Value::Date(d) => ToSqlOutput::from(d.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => ToSqlOutput::from(dt.format(DATETIME_FORMAT).to_string()),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        rusqlite::types::Value::column_result(value).map(Value::from)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Date(_) | Value::DateTime(_) => serializer.collect_str(self),
        }
    }
}
