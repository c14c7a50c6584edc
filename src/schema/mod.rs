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

//! Attribute and relationship metadata for entity types.
//!
//! Every entity type which is read from or written to a tree store has an [`EntitySchema`]
//! listing its attributes and relationships. Schemas are collected into a [`Registry`], which
//! also resolves which relationship on the related type mirrors each relationship.

pub use self::entity::{
    AttributeMeta, AttributeOptions, EntitySchema, Inverse, RelationshipKind, RelationshipMeta,
};
pub use self::registry::{Registry, RegistryBuilder, RelationshipType};

mod entity;
mod registry;
