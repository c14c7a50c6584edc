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

use tracing::trace;

use crate::error::SchemaMismatch;
use crate::record::RecordSnapshot;
use crate::schema::RelationshipMeta;
use crate::store::Patch;
use crate::value::Value;

use super::config::Retraction;
use super::serialize::Serializer;

/// Whether a record is being added to or removed from a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// The record is a member of the collection.
    Add,

    /// The record is no longer a member of the collection.
    Retract,
}

impl Membership {
    /// The value written for this membership.
    pub fn value(self, retraction: Retraction) -> Value {
        match self {
            Membership::Add => Value::Bool(true),
            Membership::Retract => retraction.value(),
        }
    }
}

impl<'a> Serializer<'a> {
    /// Write the membership of the record `snapshot` in the collection `relationship` of the
    /// record `target_id`.
    ///
    /// This serializer must be the one for the entity type which owns `relationship`. The entry is
    /// written at `{root of target_id}/{relationship}/{id of snapshot}`, using the key
    /// configuration of this entity type. Nothing is written if the collection is configured not
    /// to be serialized.
    pub fn serialize_has_many_member<S>(
        &self,
        patch: &mut Patch,
        target_id: &str,
        relationship: &RelationshipMeta,
        snapshot: &S,
        membership: Membership,
    ) -> crate::Result<()>
    where
        S: RecordSnapshot + ?Sized,
    {
        if !self.config.can_serialize(&relationship.key) {
            return Ok(());
        }

        let root = self
            .mapper
            .paths()
            .root_path_for(self.entity_type(), target_id);
        let value = membership.value(self.mapper.config().retraction);

        patch.insert(
            format!(
                "{}/{}/{}",
                root,
                self.payload_key(&relationship.key),
                snapshot.id()
            ),
            value,
        );

        Ok(())
    }

    /// Write the singular relationship `relationship` of `snapshot` under `path` and keep the
    /// collection which mirrors it on the related entity in sync.
    ///
    /// Entries are added to `patch` in this order:
    /// 1. The pointer from this record to the related record.
    /// 2. If the relationship changed and previously pointed at a record, the retraction of this
    /// record from that record's collection.
    /// 3. If the relationship points at a record, the addition of this record to that record's
    /// collection.
    ///
    /// When the relationship is cleared, only the retraction is written. When it changed from one
    /// record back to the same record, the addition replaces the retraction.
    ///
    /// # Errors
    /// - `SchemaMismatch::MissingInverse`: The relationship is not mirrored by a relationship on
    /// the related entity type. Nothing is written.
    /// - `SchemaMismatch::AmbiguousInverse`: More than one relationship could be the inverse.
    /// Nothing is written.
    /// - `UnsupportedEncoding::Polymorphic`: The relationship is polymorphic. Nothing is written.
    pub fn serialize_one_to_many<S>(
        &self,
        patch: &mut Patch,
        snapshot: &S,
        relationship: &RelationshipMeta,
        path: &str,
    ) -> crate::Result<()>
    where
        S: RecordSnapshot + ?Sized,
    {
        let inverse = self
            .mapper
            .registry()
            .inverse_for(self.entity_type(), &relationship.key)?
            .ok_or_else(|| SchemaMismatch::MissingInverse {
                entity_type: self.entity_type().to_owned(),
                key: relationship.key.clone(),
            })?;
        let target = self.mapper.serializer_for(&relationship.target_type)?;

        self.serialize_belongs_to(patch, snapshot, relationship, path)?;

        if snapshot.did_field_change(&relationship.key) {
            if let Some(previous_id) = snapshot.previous_related_id(&relationship.key) {
                trace!(
                    entity_type = self.entity_type(),
                    id = snapshot.id(),
                    key = %relationship.key,
                    %previous_id,
                    "retracting membership"
                );
                target.serialize_has_many_member(
                    patch,
                    &previous_id,
                    inverse,
                    snapshot,
                    Membership::Retract,
                )?;
            }
        }

        match snapshot.belongs_to_id(&relationship.key) {
            Some(related_id) => target.serialize_has_many_member(
                patch,
                &related_id,
                inverse,
                snapshot,
                Membership::Add,
            )?,
            None => trace!(
                entity_type = self.entity_type(),
                id = snapshot.id(),
                key = %relationship.key,
                "relationship is cleared; no membership to add"
            ),
        }

        Ok(())
    }
}
