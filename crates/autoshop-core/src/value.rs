use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::entity::{ColumnKind, EntityDescriptor};
use crate::error::{Error, Result};

/// A row as returned by the store: column name to JSON value, in column order.
pub type Record = serde_json::Map<String, JsonValue>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Typed value bound into a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Parse operator input for a column of the given kind.
    ///
    /// Blank input and `null` become `Null`. Input that does not parse as the
    /// column kind is kept as text so validation or the store can report it.
    pub fn parse(kind: ColumnKind, raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return Value::Null;
        }

        match kind {
            ColumnKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(trimmed.to_string())),
            ColumnKind::Decimal => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Text(trimmed.to_string())),
            ColumnKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Value::Date)
                .unwrap_or_else(|_| Value::Text(trimmed.to_string())),
            ColumnKind::Text => Value::Text(raw.to_string()),
        }
    }

    /// Null or blank text. Search criteria holding an empty value are skipped.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Compare with a value read back through `row_to_json`.
    pub fn matches_json(&self, json: &JsonValue) -> bool {
        match (self, json) {
            (Value::Null, JsonValue::Null) => true,
            (Value::Bool(left), JsonValue::Bool(right)) => left == right,
            (Value::Int(left), JsonValue::Number(right)) => right
                .as_i64()
                .map(|right| right == *left)
                .or_else(|| right.as_f64().map(|right| right == *left as f64))
                .unwrap_or(false),
            (Value::Float(left), JsonValue::Number(right)) => right
                .as_f64()
                .map(|right| (right - left).abs() < 1e-9)
                .unwrap_or(false),
            (Value::Text(left), JsonValue::String(right)) => left == right,
            (Value::Date(left), JsonValue::String(right)) => {
                left.format(DATE_FORMAT).to_string() == *right
            }
            (Value::Timestamp(left), JsonValue::String(right)) => {
                right.starts_with(&left.format(TIMESTAMP_FORMAT).to_string())
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
            Value::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            Value::Timestamp(value) => write!(f, "{}", value.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Ordered column/value pairs for an insert or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: Vec<(String, Value)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a payload from `column=value` assignments, typing each value by
    /// the descriptor's column kind.
    pub fn parse<I, S>(descriptor: &EntityDescriptor, assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut payload = Payload::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (column, raw) = assignment.split_once('=').ok_or_else(|| {
                Error::InvalidInput(format!("expected column=value, got '{assignment}'"))
            })?;
            let column = column.trim();
            let spec = descriptor
                .column(column)
                .ok_or_else(|| Error::UnknownColumn {
                    table: descriptor.table.to_string(),
                    column: column.to_string(),
                })?;
            payload.push(column, Value::parse(spec.kind, raw));
        }
        Ok(payload)
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        let mut payload = Payload::new();
        for (column, value) in iter {
            payload.push(column, value);
        }
        payload
    }
}
