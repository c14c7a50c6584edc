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

use crate::error::SchemaMismatch;

use super::entity::{EntitySchema, Inverse, RelationshipKind, RelationshipMeta};

/// How the two ends of a relationship relate to each other.
///
/// The first half names this end and the second half names the inverse. `None` means the
/// relationship has no inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    OneToNone,
    OneToOne,
    OneToMany,
    ManyToNone,
    ManyToOne,
    ManyToMany,
}

impl RelationshipType {
    fn new(kind: RelationshipKind, inverse_kind: Option<RelationshipKind>) -> Self {
        use RelationshipKind::{Collection, Singular};

        match (kind, inverse_kind) {
            (Singular, None) => RelationshipType::OneToNone,
            (Singular, Some(Singular)) => RelationshipType::OneToOne,
            (Singular, Some(Collection)) => RelationshipType::OneToMany,
            (Collection, None) => RelationshipType::ManyToNone,
            (Collection, Some(Singular)) => RelationshipType::ManyToOne,
            (Collection, Some(Collection)) => RelationshipType::ManyToMany,
        }
    }
}

/// The inverse of a relationship, resolved when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InverseSlot {
    None,
    Field(String),
    Ambiguous,
}

/// The schemas of every entity type.
///
/// A `Registry` is immutable once it is built. Inverse relationships are resolved when it is built
/// so that looking them up while serializing is cheap.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: HashMap<String, EntitySchema>,
    inverses: HashMap<(String, String), InverseSlot>,
}

impl Registry {
    /// Return a builder for a new registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Return the schema for `entity_type`.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    pub fn schema_for(&self, entity_type: &str) -> crate::Result<&EntitySchema> {
        self.schemas
            .get(entity_type)
            .ok_or_else(|| SchemaMismatch::UnknownEntityType(entity_type.to_owned()).into())
    }

    /// Return whether there is a schema for `entity_type`.
    pub fn contains(&self, entity_type: &str) -> bool {
        self.schemas.contains_key(entity_type)
    }

    /// Return an iterator over the names of the registered entity types.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Return the relationship `key` of `entity_type`.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    /// - `SchemaMismatch::UnknownField`: `entity_type` has no relationship `key`.
    pub fn relationship(&self, entity_type: &str, key: &str) -> crate::Result<&RelationshipMeta> {
        self.schema_for(entity_type)?
            .get_relationship(key)
            .ok_or_else(|| {
                SchemaMismatch::UnknownField {
                    entity_type: entity_type.to_owned(),
                    key: key.to_owned(),
                }
                .into()
            })
    }

    /// Return the relationship on the related entity type which mirrors the relationship `key` of
    /// `entity_type`.
    ///
    /// This returns `None` if the relationship is not mirrored.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    /// - `SchemaMismatch::UnknownField`: `entity_type` has no relationship `key`.
    /// - `SchemaMismatch::AmbiguousInverse`: More than one relationship could be the inverse.
    pub fn inverse_for(
        &self,
        entity_type: &str,
        key: &str,
    ) -> crate::Result<Option<&RelationshipMeta>> {
        let relationship = self.relationship(entity_type, key)?;
        match self
            .inverses
            .get(&(entity_type.to_owned(), key.to_owned()))
        {
            Some(InverseSlot::Field(inverse_key)) => {
                Ok(Some(self.relationship(&relationship.target_type, inverse_key)?))
            }
            Some(InverseSlot::Ambiguous) => Err(SchemaMismatch::AmbiguousInverse {
                entity_type: entity_type.to_owned(),
                key: key.to_owned(),
            }
            .into()),
            Some(InverseSlot::None) | None => Ok(None),
        }
    }

    /// Return how the relationship `key` of `entity_type` relates to its inverse.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    /// - `SchemaMismatch::UnknownField`: `entity_type` has no relationship `key`.
    /// - `SchemaMismatch::AmbiguousInverse`: More than one relationship could be the inverse.
    pub fn relationship_type(
        &self,
        entity_type: &str,
        key: &str,
    ) -> crate::Result<RelationshipType> {
        let relationship = self.relationship(entity_type, key)?;
        let inverse = self.inverse_for(entity_type, key)?;
        Ok(RelationshipType::new(
            relationship.kind,
            inverse.map(|inverse| inverse.kind),
        ))
    }
}

/// A builder for a [`Registry`].
///
/// This value is created by [`Registry::builder`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    schemas: Vec<EntitySchema>,
}

impl RegistryBuilder {
    /// Add the schema for an entity type.
    ///
    /// If a schema for the same entity type was already added, it is replaced.
    pub fn entity(mut self, schema: EntitySchema) -> Self {
        self.schemas
            .retain(|existing| existing.entity_type() != schema.entity_type());
        self.schemas.push(schema);
        self
    }

    /// Build the registry and resolve every inverse relationship.
    ///
    /// An automatic inverse which matches more than one relationship is not an error here; it
    /// becomes one when the inverse is looked up.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: A relationship points at an entity type which has
    /// no schema.
    /// - `SchemaMismatch::MissingInverse`: A named inverse is not a relationship on the target
    /// type which points back.
    pub fn build(self) -> crate::Result<Registry> {
        let schemas = self
            .schemas
            .into_iter()
            .map(|schema| (schema.entity_type().to_owned(), schema))
            .collect::<HashMap<_, _>>();

        let mut inverses = HashMap::new();

        for (entity_type, schema) in &schemas {
            for relationship in schema.relationships() {
                let target = schemas.get(&relationship.target_type).ok_or_else(|| {
                    SchemaMismatch::UnknownEntityType(relationship.target_type.clone())
                })?;

                let slot = match &relationship.inverse {
                    Inverse::None => InverseSlot::None,
                    Inverse::Named(inverse_key) => match target.get_relationship(inverse_key) {
                        Some(inverse) if &inverse.target_type == entity_type => {
                            InverseSlot::Field(inverse_key.clone())
                        }
                        _ => {
                            return Err(SchemaMismatch::MissingInverse {
                                entity_type: entity_type.clone(),
                                key: relationship.key.clone(),
                            }
                            .into())
                        }
                    },
                    Inverse::Auto => {
                        let pointing_back = target.relationships().iter().filter(|candidate| {
                            &candidate.target_type == entity_type
                                && !(target.entity_type() == entity_type
                                    && candidate.key == relationship.key)
                        });
                        let named_back = Inverse::Named(relationship.key.clone());
                        match pointing_back
                            .clone()
                            .find(|candidate| candidate.inverse == named_back)
                        {
                            Some(candidate) => InverseSlot::Field(candidate.key.clone()),
                            None => {
                                let mut candidates = pointing_back
                                    .filter(|candidate| candidate.inverse == Inverse::Auto);
                                match (candidates.next(), candidates.next()) {
                                    (None, _) => InverseSlot::None,
                                    (Some(candidate), None) => {
                                        InverseSlot::Field(candidate.key.clone())
                                    }
                                    (Some(_), Some(_)) => InverseSlot::Ambiguous,
                                }
                            }
                        }
                    }
                };

                inverses.insert((entity_type.clone(), relationship.key.clone()), slot);
            }
        }

        Ok(Registry { schemas, inverses })
    }
}
