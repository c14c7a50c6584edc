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

//! Reading records from and writing records to a tree store.
//!
//! A [`Serializer`] handles the records of one entity type. Reading turns a [`TreeNode`] into a
//! [`Document`] of normalized records. Writing turns a [`RecordSnapshot`] into a [`Patch`] which
//! the caller applies to the store in a single call.
//!
//! References between records are stored in two ways. A singular relationship is stored as the id
//! of the related record. A collection is stored as a node with one child per member, keyed by the
//! member's id with the value `true`. When a singular relationship is mirrored by a collection on
//! the related entity type, writing the singular end also writes the membership in the collection,
//! and retracts the membership from the collection it previously belonged to.
//!
//! [`TreeNode`]: crate::store::TreeNode
//! [`RecordSnapshot`]: crate::RecordSnapshot
//! [`Patch`]: crate::store::Patch

pub use self::config::{FieldOptions, KeyFormat, MapperConfig, Retraction, SerializerConfig};
pub use self::document::{
    Document, DocumentData, Linkage, NormalizedRecord, RelatedRef, RelationshipData,
};
pub use self::path::{DefaultPathBuilder, PathBuilder};
pub use self::serialize::Serializer;
pub use self::sync::Membership;
#[cfg(feature = "transform-date")]
pub use self::transform::DateTransform;
pub use self::transform::{
    BooleanTransform, NumberTransform, StringTransform, Transform, Transforms,
};

mod config;
mod document;
mod normalize;
mod path;
mod serialize;
mod sync;
mod transform;
