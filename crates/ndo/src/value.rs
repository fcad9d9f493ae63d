//! Dialect-neutral values: bind parameters, function-valued fields and result records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use uuid::Uuid;

/// A single bind value or result cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render as an inline SQL literal.
    ///
    /// Only used for `IN (...)` lists, which are embedded rather than bound.
    /// Text is single-quoted with embedded quotes doubled.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("X'{hex}'")
            }
            other => format!("'{}'", other.to_string().replace('\'', "''")),
        }
    }

    /// Convert a JSON scalar into a bind value. Objects and arrays stay JSON.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Json(other.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Json(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::TimestampTz(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::Json(v) => v.serialize(serializer),
            other => serializer.collect_str(other),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }

            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::Bind(Value::from(v))
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    Vec<u8> => Bytes,
    serde_json::Value => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Bind(Value::Text(v.clone()))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Value assigned to a column by INSERT / UPDATE.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Bound through a placeholder.
    Bind(Value),
    /// Emitted literally as `name(arg)`, e.g. `NOW()`; never bound.
    Function { name: String, arg: Option<String> },
}

impl FieldValue {
    pub fn function(name: impl Into<String>) -> Self {
        FieldValue::Function {
            name: name.into(),
            arg: None,
        }
    }

    pub fn function_with(name: impl Into<String>, arg: impl Into<String>) -> Self {
        FieldValue::Function {
            name: name.into(),
            arg: Some(arg.into()),
        }
    }

    /// `name(arg)` for function values, `None` for binds.
    pub fn call_sql(&self) -> Option<String> {
        match self {
            FieldValue::Bind(_) => None,
            FieldValue::Function { name, arg } => {
                Some(format!("{}({})", name, arg.as_deref().unwrap_or("")))
            }
        }
    }

    /// Parse the JSON descriptor form: a scalar binds, `{"function": "NOW"}`
    /// (optionally with `"value"`) is a function call. Other objects bind as JSON.
    pub fn from_json(value: &serde_json::Value) -> Self {
        if let Some(obj) = value.as_object()
            && let Some(name) = obj.get("function").and_then(|f| f.as_str())
        {
            let arg = obj.get("value").map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            return FieldValue::Function {
                name: name.to_string(),
                arg,
            };
        }
        FieldValue::Bind(Value::from_json(value))
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Bind(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        FieldValue::Bind(v.into())
    }
}

/// Ordered column assignments for one INSERT row or one UPDATE.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a bound value. Re-setting a key replaces it in place.
    pub fn set(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Assign a SQL function call with no argument, e.g. `NOW()`.
    pub fn call(mut self, key: &str, function: &str) -> Self {
        self.insert(key, FieldValue::function(function));
        self
    }

    /// Assign a SQL function call with a literal argument.
    pub fn call_with(mut self, key: &str, function: &str, arg: &str) -> Self {
        self.insert(key, FieldValue::function_with(function, arg));
        self
    }

    pub fn insert(&mut self, key: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Build from a JSON object in descriptor form. Non-objects yield no fields.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut fields = Fields::new();
        if let Some(obj) = value.as_object() {
            for (key, v) in obj {
                fields.insert(key, FieldValue::from_json(v));
            }
        }
        fields
    }
}

impl<K: AsRef<str>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k.as_ref(), v.into());
        }
        fields
    }
}

/// One result row: columns in driver order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First column's value, used for single-value results such as last ids.
    pub fn into_first(self) -> Option<Value> {
        self.columns.into_iter().next().map(|(_, v)| v)
    }

    /// Re-key every column with `rename`, keeping order.
    pub fn rename_columns(self, rename: impl Fn(&str) -> String) -> Self {
        Self {
            columns: self
                .columns
                .into_iter()
                .map(|(name, v)| (rename(&name), v))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in &self.columns {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_quotes_text() {
        assert_eq!(Value::from(3).to_literal(), "3");
        assert_eq!(Value::from("o'neil").to_literal(), "'o''neil'");
        assert_eq!(Value::Null.to_literal(), "NULL");
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(
            FieldValue::from_json(&json!({"function": "NOW"})).call_sql().as_deref(),
            Some("NOW()")
        );
        assert_eq!(
            FieldValue::from_json(&json!({"function": "ADD_DAYS", "value": "CURRENT_DATE, 1"}))
                .call_sql()
                .as_deref(),
            Some("ADD_DAYS(CURRENT_DATE, 1)")
        );
        assert_eq!(FieldValue::from_json(&json!(7)), FieldValue::Bind(Value::Int(7)));
    }

    #[test]
    fn test_fields_set_replaces_in_place() {
        let fields = Fields::new().set("a", 1).set("b", 2).set("a", 3);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(fields.get("a"), Some(&FieldValue::Bind(Value::Int(3))));
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let mut record = Record::new();
        record.push("id", Value::Int(1));
        record.push("name", Value::from("alice"));
        record.push("deleted", Value::Null);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":1,"name":"alice","deleted":null}"#
        );
    }
}
