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

use tracing::debug;

use crate::error::UnsupportedEncoding;
use crate::schema::RelationshipKind;
use crate::store::TreeNode;
use crate::value::Value;

use super::document::{
    Document, DocumentData, Linkage, NormalizedRecord, RelatedRef, RelationshipData,
};
use super::serialize::Serializer;

/// Return the value of an attribute stored at `node`.
///
/// A branch is only accepted if it is a list stored by index. Indices missing from the store were
/// written as `null`, so they are read back as `Value::Null`. Like a realtime tree store, a branch
/// is only treated as a list if at least half of the indices up to the largest one are present.
fn attribute_value(node: &TreeNode) -> crate::Result<Value> {
    if let Some(value) = node.value() {
        return Ok(value.clone());
    }

    let embedded = || {
        crate::Error::from(UnsupportedEncoding::Embedded {
            key: node.key().to_owned(),
        })
    };

    let mut indexed = Vec::new();
    for child in node.children() {
        let index = child.key().parse::<usize>().map_err(|_| embedded())?;
        let value = child.value().ok_or_else(embedded)?;
        indexed.push((index, value));
    }

    let len = indexed
        .iter()
        .map(|(index, _)| index + 1)
        .max()
        .unwrap_or(0);
    if len > indexed.len() * 2 {
        return Err(embedded());
    }

    let mut items = vec![Value::Null; len];
    for (index, value) in indexed {
        items[index] = value.clone();
    }

    Ok(Value::List(items))
}

impl<'a> Serializer<'a> {
    /// Return the id of the record rooted at `node`.
    pub fn extract_id(&self, node: &TreeNode) -> String {
        node.key().to_owned()
    }

    /// Return the attributes of the record rooted at `node`, by attribute key.
    ///
    /// Attributes which are not in the store are omitted.
    ///
    /// # Errors
    /// - `UnsupportedEncoding::Embedded`: An attribute is stored as a nested object.
    pub fn extract_attributes(&self, node: &TreeNode) -> crate::Result<BTreeMap<String, Value>> {
        let mut attributes = BTreeMap::new();

        for attribute in self.schema.attributes() {
            if let Some(child) = node.child(&self.payload_key(&attribute.key)) {
                if child.exists() {
                    attributes.insert(attribute.key.clone(), attribute_value(child)?);
                }
            }
        }

        Ok(attributes)
    }

    /// Return the relationships of the record rooted at `node`, by relationship key.
    ///
    /// Relationships which are not in the store are omitted. Members of a collection which were
    /// retracted by writing `false` are skipped.
    ///
    /// # Errors
    /// - `UnsupportedEncoding::Polymorphic`: A polymorphic relationship is in the store.
    /// - `UnsupportedEncoding::Embedded`: A relationship is stored as a nested object.
    pub fn extract_relationships(
        &self,
        node: &TreeNode,
    ) -> crate::Result<BTreeMap<String, RelationshipData>> {
        let mut relationships = BTreeMap::new();

        for relationship in self.schema.relationships() {
            let child = match node.child(&self.payload_key(&relationship.key)) {
                Some(child) if child.exists() => child,
                _ => continue,
            };

            if relationship.kind == RelationshipKind::Singular && relationship.polymorphic {
                return Err(UnsupportedEncoding::Polymorphic {
                    entity_type: self.entity_type().to_owned(),
                    key: relationship.key.clone(),
                }
                .into());
            }

            let data = match relationship.kind {
                RelationshipKind::Singular => {
                    match self.extract_relationship(&relationship.target_type, child)? {
                        Some(related) => Linkage::One(related),
                        None => Linkage::Null,
                    }
                }
                RelationshipKind::Collection => {
                    let mut members = Vec::new();
                    for member in child.children() {
                        if member.value() == Some(&Value::Bool(false)) {
                            continue;
                        }
                        if let Some(related) =
                            self.extract_relationship(&relationship.target_type, member)?
                        {
                            members.push(related);
                        }
                    }
                    Linkage::Many(members)
                }
            };

            relationships.insert(relationship.key.clone(), RelationshipData { data });
        }

        Ok(relationships)
    }

    /// Resolve the reference to a record of `target_type` stored at `node`.
    ///
    /// A reference is stored either as the key of a node whose value is `true` or as the value of
    /// a node. This returns `None` if `node` does not exist.
    ///
    /// # Errors
    /// - `UnsupportedEncoding::Embedded`: `node` is a nested object.
    pub fn extract_relationship(
        &self,
        target_type: &str,
        node: &TreeNode,
    ) -> crate::Result<Option<RelatedRef>> {
        if !node.exists() {
            return Ok(None);
        }

        if node.has_children() {
            return Err(UnsupportedEncoding::Embedded {
                key: node.key().to_owned(),
            }
            .into());
        }

        let id = match node.value() {
            Some(value) if value.is_membership() => Some(node.key().to_owned()),
            Some(value) => value.as_id(),
            None => None,
        };

        Ok(id.map(|id| RelatedRef::new(target_type, id)))
    }

    /// Return the normalized record rooted at `node`.
    ///
    /// # Errors
    /// - `Error::Unsupported`: The record uses an encoding which is not supported.
    pub fn normalize_record(&self, node: &TreeNode) -> crate::Result<NormalizedRecord> {
        Ok(NormalizedRecord {
            id: self.extract_id(node),
            entity_type: self.entity_type().to_owned(),
            attributes: self.extract_attributes(node)?,
            relationships: self.extract_relationships(node)?,
        })
    }

    /// Return a document containing the single record rooted at `node`.
    ///
    /// # Errors
    /// - `Error::Unsupported`: The record uses an encoding which is not supported.
    pub fn normalize(&self, node: &TreeNode) -> crate::Result<Document> {
        Ok(Document {
            data: DocumentData::One(self.normalize_record(node)?),
            included: Vec::new(),
        })
    }

    /// Return a document containing every record which is a child of `node`, in store order.
    ///
    /// Children which do not exist are skipped.
    ///
    /// # Errors
    /// - `Error::Unsupported`: A record uses an encoding which is not supported.
    pub fn normalize_array_response(&self, node: &TreeNode) -> crate::Result<Document> {
        let mut records = Vec::new();
        let mut included = Vec::new();

        for child in node.children().filter(|child| child.exists()) {
            let document = self.normalize(child)?;
            included.extend(document.included);
            if let DocumentData::One(record) = document.data {
                records.push(record);
            }
        }

        debug!(
            entity_type = self.entity_type(),
            records = records.len(),
            "normalized collection"
        );

        Ok(Document {
            data: DocumentData::Many(records),
            included,
        })
    }
}
