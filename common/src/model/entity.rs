//! # Attribute Store
//!
//! Every dynamic entity of the form module (a form definition or a submitted
//! record) is backed by an [`Entity`]: an open, name-indexed bag of typed values.
//! Attribute names are compared case-insensitively and any name may be stored,
//! whether or not a schema declares it.
//!
//! The declared system columns of an entity kind are listed separately as
//! [`TableColumn`](crate::model::column::TableColumn) tables; the store itself
//! never rejects an attribute.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Textual layout used whenever a date-time attribute is rendered as a string.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A dynamically-typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
    String(String),
    /// Ordered string list, used by multi-choice inputs.
    List(Vec<String>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Renders the value the way it is written into text columns and archives.
    /// Lists become a JSON array of strings; `Null` renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                let json = serde_json::to_string(items).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Decimal(_) | Value::DateTime(_) | Value::String(_) => {
                serde_json::Value::String(value.to_string())
            }
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|s| serde_json::Value::String(s.clone()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n
                    .to_string()
                    .parse::<Decimal>()
                    .map(Value::Decimal)
                    .unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other @ serde_json::Value::Object(_) => Value::String(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    /// Name as first written; lookups go through the lowercase key.
    name: String,
    value: Value,
}

/// Case-insensitive attribute bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    attributes: BTreeMap<String, Slot>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(&Self::key(name)).map(|slot| &slot.value)
    }

    /// Stores `value` under `name`, keeping the spelling of an existing attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.attributes.get_mut(&Self::key(name)) {
            Some(slot) => slot.value = value,
            None => {
                self.attributes.insert(
                    Self::key(name),
                    Slot {
                        name: name.to_string(),
                        value,
                    },
                );
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(&Self::key(name)).map(|slot| slot.value)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .values()
            .map(|slot| (slot.name.as_str(), &slot.value))
    }

    /// String rendering of an attribute, empty when absent or null.
    pub fn get_string(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn get_i64(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(Value::Integer(i)) => *i,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn get_bool(&self, name: &str) -> bool {
        match self.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn get_date_time(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name) {
            Some(Value::DateTime(dt)) => Some(*dt),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(Value::List(items)) => items.clone(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}
