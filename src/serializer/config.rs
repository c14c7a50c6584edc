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

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How field keys are named in the store when no explicit name is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFormat {
    /// Use the key of the field as-is.
    Verbatim,

    /// Convert the key to `camelCase`.
    CamelCase,

    /// Convert the key to `snake_case`.
    SnakeCase,
}

impl KeyFormat {
    /// Return the key in the store for the field `key`.
    pub fn format(self, key: &str) -> String {
        match self {
            KeyFormat::Verbatim => key.to_owned(),
            KeyFormat::CamelCase => camel_case(key),
            KeyFormat::SnakeCase => snake_case(key),
        }
    }
}

/// The value written to a collection member to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Retraction {
    /// Write `null`, which removes the member from the store.
    Null,

    /// Write `false`, which leaves a member that readers skip.
    False,
}

impl Retraction {
    /// The value written to retract a membership.
    pub fn value(self) -> Value {
        match self {
            Retraction::Null => Value::Null,
            Retraction::False => Value::Bool(false),
        }
    }
}

/// The configuration for a [`Mapper`].
///
/// This type implements `Default` to provide a reasonable default configuration.
///
/// [`Mapper`]: crate::Mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct MapperConfig {
    /// How field keys are named in the store.
    ///
    /// This applies both when reading and when writing. A name configured with
    /// [`FieldOptions::key`] takes precedence.
    ///
    /// The default value is `KeyFormat::Verbatim`.
    pub key_format: KeyFormat,

    /// The value written to a collection member to remove it.
    ///
    /// The default value is `Retraction::Null`.
    pub retraction: Retraction,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            key_format: KeyFormat::Verbatim,
            retraction: Retraction::Null,
        }
    }
}

/// How a single field of an entity type is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// The key in the store, which overrides the [`KeyFormat`].
    #[serde(default)]
    pub key: Option<String>,

    /// Whether the field is written at all.
    ///
    /// The default value is `true`.
    #[serde(default = "default_serialize")]
    pub serialize: bool,
}

fn default_serialize() -> bool {
    true
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions {
            key: None,
            serialize: true,
        }
    }
}

/// The per-entity-type configuration of a [`Serializer`].
///
/// Fields with no entry are written under their formatted key.
///
/// [`Serializer`]: crate::serializer::Serializer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Options for individual fields, by field key.
    #[serde(default)]
    pub attrs: HashMap<String, FieldOptions>,
}

impl SerializerConfig {
    /// Return an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the field `key` under `stored_key`.
    pub fn rename(mut self, key: impl Into<String>, stored_key: impl Into<String>) -> Self {
        self.attrs.entry(key.into()).or_default().key = Some(stored_key.into());
        self
    }

    /// Never write the field `key`.
    pub fn skip(mut self, key: impl Into<String>) -> Self {
        self.attrs.entry(key.into()).or_default().serialize = false;
        self
    }

    /// Return whether the field `key` is written.
    pub fn can_serialize(&self, key: &str) -> bool {
        self.attrs
            .get(key)
            .map_or(true, |options| options.serialize)
    }

    /// Return the key configured for the field `key`, if there is one.
    pub fn mapped_key(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(key)
            .and_then(|options| options.key.as_deref())
    }
}

fn camel_case(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut upper_next = false;
    for character in key.chars() {
        if character == '_' || character == '-' || character == ' ' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(character.to_uppercase());
            upper_next = false;
        } else if result.is_empty() {
            result.extend(character.to_lowercase());
        } else {
            result.push(character);
        }
    }
    result
}

fn snake_case(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 4);
    for character in key.chars() {
        if character == '-' || character == ' ' {
            result.push('_');
        } else if character.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(character.to_lowercase());
        } else {
            result.push(character);
        }
    }
    result
}
