use serde::{Deserialize, Serialize};

/// Extension type for themes that carry no non-portable literal kinds.
///
/// Uninhabited, so `Value<NoExtension>` is exactly number | string | list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoExtension {}

/// A symbol value, or a fully resolved property value.
///
/// `T` carries literal kinds that only make sense to a particular consumer
/// (a gradient object, a font descriptor, ...). Lists are ordered and may nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value<T = NoExtension> {
    Number(f64),
    /// A plain string. May be a color string.
    Text(String),
    List(Vec<Value<T>>),
    Ext(T),
}

impl<T> Value<T> {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// True if this value, or any list nested inside it, is an empty list.
    pub fn contains_empty_list(&self) -> bool {
        match self {
            Value::List(items) => items.is_empty() || items.iter().any(Value::contains_empty_list),
            _ => false,
        }
    }
}

impl<T> From<f64> for Value<T> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<T> From<&str> for Value<T> {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T> From<String> for Value<T> {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T> From<Vec<Value<T>>> for Value<T> {
    fn from(items: Vec<Value<T>>) -> Self {
        Value::List(items)
    }
}
