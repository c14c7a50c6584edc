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

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaMismatch;
use crate::value::Value;

/// Options passed to the transform for an attribute's scalar type.
pub type AttributeOptions = BTreeMap<String, Value>;

/// Whether a relationship points at one entity or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// A to-one reference, stored as a field holding the related id.
    #[serde(alias = "belongsTo")]
    Singular,

    /// A to-many reference, stored as a sub-tree of `id: true` members.
    #[serde(alias = "hasMany")]
    Collection,
}

impl FromStr for RelationshipKind {
    type Err = crate::Error;

    /// Parse a relationship kind.
    ///
    /// This accepts `belongsTo` and `singular` for `Singular` and `hasMany` and `collection` for
    /// `Collection`.
    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "belongsTo" | "singular" => Ok(RelationshipKind::Singular),
            "hasMany" | "collection" => Ok(RelationshipKind::Collection),
            other => Err(SchemaMismatch::UnknownKind(other.to_owned()).into()),
        }
    }
}

/// How to find the relationship on the related entity type which mirrors a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Inverse {
    /// Use the only relationship on the related type which points back at this type, if any.
    Auto,

    /// The relationship is not mirrored.
    None,

    /// The relationship with this key on the related type.
    Named(String),
}

impl Default for Inverse {
    fn default() -> Self {
        Inverse::Auto
    }
}

/// Metadata about an attribute of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMeta {
    /// The key of the attribute on the record.
    pub key: String,

    /// The scalar type whose transform is applied when this attribute is written.
    ///
    /// If this is `None`, the value is written as-is.
    #[serde(default)]
    pub scalar_type: Option<String>,

    /// Options passed to the transform.
    #[serde(default)]
    pub options: AttributeOptions,
}

impl AttributeMeta {
    /// Return an untyped attribute with the given `key`.
    pub fn new(key: impl Into<String>) -> Self {
        AttributeMeta {
            key: key.into(),
            scalar_type: None,
            options: AttributeOptions::new(),
        }
    }

    /// Return an attribute with the given `key` and `scalar_type`.
    pub fn typed(key: impl Into<String>, scalar_type: impl Into<String>) -> Self {
        AttributeMeta {
            scalar_type: Some(scalar_type.into()),
            ..AttributeMeta::new(key)
        }
    }

    /// Set a transform option on this attribute.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

/// Metadata about a relationship of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipMeta {
    /// The key of the relationship on the record.
    pub key: String,

    /// Whether this relationship points at one entity or many.
    pub kind: RelationshipKind,

    /// The entity type this relationship points at.
    pub target_type: String,

    /// Whether the related entity may be of more than one type.
    #[serde(default)]
    pub polymorphic: bool,

    /// The relationship on the target type which mirrors this one.
    #[serde(default)]
    pub inverse: Inverse,
}

impl RelationshipMeta {
    /// Return a singular relationship with the given `key` pointing at `target_type`.
    pub fn belongs_to(key: impl Into<String>, target_type: impl Into<String>) -> Self {
        RelationshipMeta {
            key: key.into(),
            kind: RelationshipKind::Singular,
            target_type: target_type.into(),
            polymorphic: false,
            inverse: Inverse::Auto,
        }
    }

    /// Return a collection relationship with the given `key` pointing at `target_type`.
    pub fn has_many(key: impl Into<String>, target_type: impl Into<String>) -> Self {
        RelationshipMeta {
            kind: RelationshipKind::Collection,
            ..RelationshipMeta::belongs_to(key, target_type)
        }
    }

    /// Mark this relationship as polymorphic.
    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    /// Use the relationship named `key` on the target type as the inverse.
    pub fn inverse(mut self, key: impl Into<String>) -> Self {
        self.inverse = Inverse::Named(key.into());
        self
    }

    /// Mark this relationship as not mirrored on the target type.
    pub fn no_inverse(mut self) -> Self {
        self.inverse = Inverse::None;
        self
    }
}

/// The attributes and relationships of an entity type.
///
/// Both are kept in the order they were declared, which is the order they are read and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    entity_type: String,
    #[serde(default)]
    attributes: Vec<AttributeMeta>,
    #[serde(default)]
    relationships: Vec<RelationshipMeta>,
}

impl EntitySchema {
    /// Return a schema for `entity_type` with no fields.
    pub fn new(entity_type: impl Into<String>) -> Self {
        EntitySchema {
            entity_type: entity_type.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Add an attribute to this schema.
    pub fn attribute(mut self, attribute: AttributeMeta) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a relationship to this schema.
    pub fn relationship(mut self, relationship: RelationshipMeta) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// The name of the entity type.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeMeta] {
        &self.attributes
    }

    /// The relationships in declaration order.
    pub fn relationships(&self) -> &[RelationshipMeta] {
        &self.relationships
    }

    /// Return the attribute with the given `key`.
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeMeta> {
        self.attributes.iter().find(|attribute| attribute.key == key)
    }

    /// Return the relationship with the given `key`.
    pub fn get_relationship(&self, key: &str) -> Option<&RelationshipMeta> {
        self.relationships
            .iter()
            .find(|relationship| relationship.key == key)
    }
}
