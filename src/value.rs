/*
 * Copyright 2022 Wren Powell
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value stored at a leaf of a tree store.
///
/// This serializes to and from plain JSON scalars. `List` is only produced by writing a whole
/// collection of ids at once; a tree store keeps its elements as children keyed by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Return whether this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Return whether this is the sentinel which marks membership in a collection.
    pub fn is_membership(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Return this value as the id of a referenced entity.
    ///
    /// Strings are returned verbatim and numbers in decimal. This returns `None` for `Null` and
    /// `List`.
    pub fn as_id(&self) -> Option<String> {
        match self {
            Value::Null | Value::List(_) => None,
            Value::Bool(value) => Some(value.to_string()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Float(value) => Some(value.to_string()),
            Value::String(value) => Some(value.clone()),
        }
    }

    /// Return the string slice if this is a `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{:?}", value),
            Value::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// JSON objects have no `Value` and become `Value::Null`, including objects inside arrays. Use
/// [`MemoryStore::from_json`] to store a JSON document which contains objects.
///
/// [`MemoryStore::from_json`]: crate::store::MemoryStore::from_json
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Value::Integer(value),
                None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => Value::String(value),
            serde_json::Value::Array(values) => {
                Value::List(values.into_iter().map(Value::from).collect())
            }
            // Objects are sub-trees, not values.
            serde_json::Value::Object(_) => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_scalars() {
        assert_eq!(Value::from("abc").as_id(), Some(String::from("abc")));
        assert_eq!(Value::from(42).as_id(), Some(String::from("42")));
        assert_eq!(Value::Null.as_id(), None);
        assert_eq!(Value::from(vec!["a"]).as_id(), None);
    }

    #[test]
    fn only_true_is_membership() {
        assert!(Value::Bool(true).is_membership());
        assert!(!Value::Bool(false).is_membership());
        assert!(!Value::from("true").is_membership());
    }

    #[test]
    fn converts_from_json() {
        let value = Value::from(serde_json::json!(["a", 1, 1.5, null, true]));
        assert_eq!(
            value,
            Value::List(vec![
                Value::from("a"),
                Value::Integer(1),
                Value::Float(1.5),
                Value::Null,
                Value::Bool(true),
            ])
        );
    }
}
