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

use tracing::{debug, trace};

use crate::error::UnsupportedEncoding;
use crate::mapper::Mapper;
use crate::record::RecordSnapshot;
use crate::schema::{AttributeMeta, EntitySchema, RelationshipMeta, RelationshipType};
use crate::store::Patch;
use crate::value::Value;

use super::config::SerializerConfig;

/// Reads and writes the records of one entity type.
///
/// A `Serializer` turns tree nodes into normalized records and records into patch entries. It is
/// configured for a single entity type; writing a relationship which must also be recorded on the
/// related entity delegates that part to the serializer for the related type.
///
/// This value is created by [`Mapper::serializer_for`].
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    pub(super) mapper: &'a Mapper,
    pub(super) schema: &'a EntitySchema,
    pub(super) config: &'a SerializerConfig,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(
        mapper: &'a Mapper,
        schema: &'a EntitySchema,
        config: &'a SerializerConfig,
    ) -> Self {
        Serializer {
            mapper,
            schema,
            config,
        }
    }

    /// The entity type this serializer is configured for.
    pub fn entity_type(&self) -> &'a str {
        self.schema.entity_type()
    }

    /// The schema of the entity type this serializer is configured for.
    pub fn schema(&self) -> &'a EntitySchema {
        self.schema
    }

    /// Return the key in the store for the field `key`.
    ///
    /// A key configured for the field takes precedence over the mapper's [`KeyFormat`].
    ///
    /// [`KeyFormat`]: crate::serializer::KeyFormat
    pub fn payload_key(&self, key: &str) -> String {
        match self.config.mapped_key(key) {
            Some(mapped) if mapped != key => mapped.to_owned(),
            _ => self.mapper.config().key_format.format(key),
        }
    }

    /// Build the patch which writes the record `snapshot` at `path`.
    ///
    /// Every attribute is written. Each relationship is written according to how it relates to its
    /// inverse:
    /// - A singular relationship mirrored by a collection is written from both ends with
    /// [`serialize_one_to_many`].
    /// - Any other singular relationship is written as a pointer with [`serialize_belongs_to`].
    /// - A collection with no inverse or mirrored by another collection is written as a list with
    /// [`serialize_has_many`]. Each end of a many-to-many relationship owns its own list.
    /// - A collection mirrored by a singular relationship is written from the singular end and is
    /// skipped here.
    ///
    /// # Errors
    /// - `Error::Unsupported`: A relationship uses an encoding which is not supported.
    /// - `Error::SchemaMismatch`: An inverse relationship could not be resolved.
    /// - `Error::UnknownTransform`: An attribute has a scalar type with no transform.
    /// - `Error::InvalidValue`: An attribute value could not be transformed.
    ///
    /// [`serialize_one_to_many`]: Serializer::serialize_one_to_many
    /// [`serialize_belongs_to`]: Serializer::serialize_belongs_to
    /// [`serialize_has_many`]: Serializer::serialize_has_many
    pub fn serialize<S>(&self, snapshot: &S, path: &str) -> crate::Result<Patch>
    where
        S: RecordSnapshot + ?Sized,
    {
        let mut patch = Patch::new();

        for attribute in self.schema.attributes() {
            self.serialize_attribute(&mut patch, snapshot, attribute, path)?;
        }

        let registry = self.mapper.registry();
        for relationship in self.schema.relationships() {
            match registry.relationship_type(self.entity_type(), &relationship.key)? {
                RelationshipType::OneToMany => {
                    self.serialize_one_to_many(&mut patch, snapshot, relationship, path)?
                }
                RelationshipType::OneToNone | RelationshipType::OneToOne => {
                    self.serialize_belongs_to(&mut patch, snapshot, relationship, path)?
                }
                RelationshipType::ManyToNone | RelationshipType::ManyToMany => {
                    self.serialize_has_many(&mut patch, snapshot, relationship, path)?
                }
                RelationshipType::ManyToOne => {
                    trace!(
                        entity_type = self.entity_type(),
                        key = %relationship.key,
                        "relationship is written from the singular end"
                    );
                }
            }
        }

        debug!(
            entity_type = self.entity_type(),
            id = snapshot.id(),
            entries = patch.len(),
            "serialized record"
        );

        Ok(patch)
    }

    /// Write the attribute `attribute` of `snapshot` under `path`.
    ///
    /// The transform for the attribute's scalar type is applied first. Nothing is written if the
    /// attribute is configured not to be serialized.
    ///
    /// # Errors
    /// - `Error::UnknownTransform`: The attribute has a scalar type with no transform.
    /// - `Error::InvalidValue`: The value could not be transformed.
    pub fn serialize_attribute<S>(
        &self,
        patch: &mut Patch,
        snapshot: &S,
        attribute: &AttributeMeta,
        path: &str,
    ) -> crate::Result<()>
    where
        S: RecordSnapshot + ?Sized,
    {
        if !self.config.can_serialize(&attribute.key) {
            return Ok(());
        }

        let mut value = snapshot.attr(&attribute.key);
        if let Some(scalar_type) = &attribute.scalar_type {
            value = self
                .mapper
                .transforms()
                .transform_for(scalar_type)?
                .serialize(&value, &attribute.options)?;
        }

        patch.insert(
            format!("{}/{}", path, self.payload_key(&attribute.key)),
            value,
        );

        Ok(())
    }

    /// Write the singular relationship `relationship` of `snapshot` under `path` as the id of the
    /// related entity, or `null` if there is none.
    ///
    /// Nothing is written if the relationship is configured not to be serialized.
    ///
    /// # Errors
    /// - `UnsupportedEncoding::Polymorphic`: The relationship is polymorphic. Nothing is written.
    pub fn serialize_belongs_to<S>(
        &self,
        patch: &mut Patch,
        snapshot: &S,
        relationship: &RelationshipMeta,
        path: &str,
    ) -> crate::Result<()>
    where
        S: RecordSnapshot + ?Sized,
    {
        if !self.config.can_serialize(&relationship.key) {
            return Ok(());
        }

        if relationship.polymorphic {
            return Err(UnsupportedEncoding::Polymorphic {
                entity_type: self.entity_type().to_owned(),
                key: relationship.key.clone(),
            }
            .into());
        }

        let related_id = snapshot.belongs_to_id(&relationship.key);
        patch.insert(
            format!("{}/{}", path, self.payload_key(&relationship.key)),
            Value::from(related_id),
        );

        Ok(())
    }

    /// Write the collection relationship `relationship` of `snapshot` under `path` as a list of
    /// the related ids.
    ///
    /// Nothing is written if the relationship is configured not to be serialized or if the
    /// snapshot does not have the relationship loaded.
    pub fn serialize_has_many<S>(
        &self,
        patch: &mut Patch,
        snapshot: &S,
        relationship: &RelationshipMeta,
        path: &str,
    ) -> crate::Result<()>
    where
        S: RecordSnapshot + ?Sized,
    {
        if !self.config.can_serialize(&relationship.key) {
            return Ok(());
        }

        if let Some(related_ids) = snapshot.has_many_ids(&relationship.key) {
            patch.insert(
                format!("{}/{}", path, self.payload_key(&relationship.key)),
                Value::from(related_ids),
            );
        }

        Ok(())
    }
}
