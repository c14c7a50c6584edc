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

use serde::Serialize;

use crate::value::Value;

/// A reference to a related entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelatedRef {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl RelatedRef {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        RelatedRef {
            id: id.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// The entities a relationship points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Linkage {
    /// A singular relationship which points at nothing.
    Null,

    /// A singular relationship.
    One(RelatedRef),

    /// A collection relationship, in store order.
    Many(Vec<RelatedRef>),
}

/// The value of one relationship of a normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipData {
    pub data: Linkage,
}

/// A record read from a tree store.
///
/// An attribute or relationship which is absent from these maps was not in the store. That is
/// different from an attribute which is `null` or a relationship which points at nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, RelationshipData>,
}

/// The primary data of a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentData {
    One(NormalizedRecord),
    Many(Vec<NormalizedRecord>),
}

/// One or more normalized records and the related records read along with them.
///
/// This serializes to the JSON:API shape `{ "data": ..., "included": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: DocumentData,
    pub included: Vec<NormalizedRecord>,
}

impl Document {
    /// Return the primary records of this document in order.
    pub fn records(&self) -> &[NormalizedRecord] {
        match &self.data {
            DocumentData::One(record) => std::slice::from_ref(record),
            DocumentData::Many(records) => records,
        }
    }

    /// Render this document as JSON.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
