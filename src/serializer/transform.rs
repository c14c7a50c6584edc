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

use std::collections::HashMap;
use std::fmt;

use crate::schema::AttributeOptions;
use crate::value::Value;

/// A conversion applied to attribute values of a scalar type before they are written.
///
/// Transforms are pure. Values read from the store are not transformed.
pub trait Transform: Send + Sync {
    /// Convert `value` into the value which is written to the store.
    ///
    /// # Errors
    /// - `Error::InvalidValue`: `value` cannot be represented as this scalar type.
    fn serialize(&self, value: &Value, options: &AttributeOptions) -> crate::Result<Value>;
}

fn invalid(scalar_type: &str, value: &Value) -> crate::Error {
    crate::Error::InvalidValue {
        scalar_type: scalar_type.to_owned(),
        value: value.to_string(),
    }
}

/// Writes any scalar as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTransform;

impl Transform for StringTransform {
    fn serialize(&self, value: &Value, _options: &AttributeOptions) -> crate::Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(_) => Ok(value.clone()),
            Value::List(_) => Err(invalid("string", value)),
            other => Ok(Value::String(other.to_string())),
        }
    }
}

/// Writes numbers, parsing strings and writing `null` for anything which is not a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberTransform;

impl Transform for NumberTransform {
    fn serialize(&self, value: &Value, _options: &AttributeOptions) -> crate::Result<Value> {
        Ok(match value {
            Value::Integer(_) => value.clone(),
            Value::Float(number) if number.is_finite() => value.clone(),
            Value::Bool(flag) => Value::Integer(i64::from(*flag)),
            Value::String(text) if !text.trim().is_empty() => {
                let text = text.trim();
                match text.parse::<i64>() {
                    Ok(number) => Value::Integer(number),
                    Err(_) => match text.parse::<f64>() {
                        Ok(number) if number.is_finite() => Value::Float(number),
                        _ => Value::Null,
                    },
                }
            }
            Value::List(_) => return Err(invalid("number", value)),
            _ => Value::Null,
        })
    }
}

/// Writes booleans using the truthiness of the value.
///
/// `null` is written as `false` unless the attribute has the option `allowNull` set to `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTransform;

impl Transform for BooleanTransform {
    fn serialize(&self, value: &Value, options: &AttributeOptions) -> crate::Result<Value> {
        let allow_null = options.get("allowNull") == Some(&Value::Bool(true));
        Ok(match value {
            Value::Null if allow_null => Value::Null,
            Value::Null => Value::Bool(false),
            Value::Bool(_) => value.clone(),
            Value::Integer(number) => Value::Bool(*number != 0),
            Value::Float(number) => Value::Bool(*number != 0.0 && !number.is_nan()),
            Value::String(text) => Value::Bool(!text.is_empty()),
            Value::List(_) => Value::Bool(true),
        })
    }
}

/// Writes dates as RFC 3339 timestamps in UTC with millisecond precision.
///
/// This accepts milliseconds since the Unix epoch or any RFC 3339 string.
#[cfg(feature = "transform-date")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTransform;

#[cfg(feature = "transform-date")]
impl Transform for DateTransform {
    fn serialize(&self, value: &Value, _options: &AttributeOptions) -> crate::Result<Value> {
        use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

        let date = match value {
            Value::Null => return Ok(Value::Null),
            Value::Integer(millis) => Utc.timestamp_millis_opt(*millis).single(),
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            _ => None,
        };

        date.map(|date| Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .ok_or_else(|| invalid("date", value))
    }
}

/// The transforms for each scalar type, by name.
///
/// The default registry has `string`, `number`, and `boolean`, and `date` when the
/// `transform-date` feature is enabled.
pub struct Transforms {
    transforms: HashMap<String, Box<dyn Transform>>,
}

impl Transforms {
    /// Return a registry with no transforms.
    pub fn empty() -> Self {
        Transforms {
            transforms: HashMap::new(),
        }
    }

    /// Use `transform` for the scalar type `name`.
    ///
    /// This replaces any transform already registered for `name`.
    pub fn register(&mut self, name: impl Into<String>, transform: impl Transform + 'static) {
        self.transforms.insert(name.into(), Box::new(transform));
    }

    /// Return the transform for the scalar type `name`.
    ///
    /// # Errors
    /// - `Error::UnknownTransform`: There is no transform for `name`.
    pub fn transform_for(&self, name: &str) -> crate::Result<&dyn Transform> {
        self.transforms
            .get(name)
            .map(|transform| transform.as_ref())
            .ok_or_else(|| crate::Error::UnknownTransform(name.to_owned()))
    }
}

impl Default for Transforms {
    fn default() -> Self {
        let mut transforms = Transforms::empty();
        transforms.register("string", StringTransform);
        transforms.register("number", NumberTransform);
        transforms.register("boolean", BooleanTransform);
        #[cfg(feature = "transform-date")]
        transforms.register("date", DateTransform);
        transforms
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transforms")
            .field("types", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize(name: &str, value: impl Into<Value>) -> crate::Result<Value> {
        Transforms::default()
            .transform_for(name)?
            .serialize(&value.into(), &AttributeOptions::new())
    }

    #[test]
    fn numbers_parse_strings() {
        assert_eq!(serialize("number", "12").unwrap(), Value::Integer(12));
        assert_eq!(serialize("number", " 1.5 ").unwrap(), Value::Float(1.5));
        assert_eq!(serialize("number", "twelve").unwrap(), Value::Null);
        assert_eq!(serialize("number", "").unwrap(), Value::Null);
    }

    #[test]
    fn booleans_allow_null_only_when_asked() {
        let transform = BooleanTransform;
        let mut options = AttributeOptions::new();
        assert_eq!(transform.serialize(&Value::Null, &options).unwrap(), Value::Bool(false));
        options.insert("allowNull".into(), Value::Bool(true));
        assert_eq!(transform.serialize(&Value::Null, &options).unwrap(), Value::Null);
    }

    #[test]
    fn strings_render_scalars() {
        assert_eq!(serialize("string", 42).unwrap(), Value::from("42"));
        assert_eq!(serialize("string", Value::Null).unwrap(), Value::Null);
    }

    #[test]
    #[cfg(feature = "transform-date")]
    fn dates_are_normalized_to_utc() {
        assert_eq!(
            serialize("date", 0i64).unwrap(),
            Value::from("1970-01-01T00:00:00.000Z")
        );
        assert_eq!(
            serialize("date", "2020-06-01T12:00:00+02:00").unwrap(),
            Value::from("2020-06-01T10:00:00.000Z")
        );
        assert!(matches!(
            serialize("date", "yesterday"),
            Err(crate::Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_types_are_errors() {
        assert!(matches!(
            serialize("money", 1),
            Err(crate::Error::UnknownTransform(name)) if name == "money"
        ));
    }
}
