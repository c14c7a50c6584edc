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

use std::result;

use thiserror::Error as DeriveError;

/// A relationship encoding which this library does not implement.
///
/// These are never handled by guessing. Any operation which encounters one of them fails before
/// anything is written.
#[derive(Debug, Clone, PartialEq, Eq, DeriveError)]
pub enum UnsupportedEncoding {
    /// A singular relationship which may point at more than one entity type.
    #[error("The polymorphic relationship `{key}` on `{entity_type}` is not supported.")]
    Polymorphic { entity_type: String, key: String },

    /// A relationship whose payload is a nested object instead of a reference.
    #[error("The embedded relationship payload at `{key}` is not supported.")]
    Embedded { key: String },
}

/// The schema does not describe the data or operation it was asked about.
#[derive(Debug, Clone, PartialEq, Eq, DeriveError)]
pub enum SchemaMismatch {
    /// No schema is registered for this entity type.
    #[error("There is no schema for the entity type `{0}`.")]
    UnknownEntityType(String),

    /// The entity type has no attribute or relationship with this key.
    #[error("The entity type `{entity_type}` has no field `{key}`.")]
    UnknownField { entity_type: String, key: String },

    /// A relationship kind other than singular or collection.
    #[error("`{0}` is not a relationship kind.")]
    UnknownKind(String),

    /// A mirrored relationship has no inverse on the related entity type.
    #[error("The relationship `{key}` on `{entity_type}` has no inverse.")]
    MissingInverse { entity_type: String, key: String },

    /// More than one relationship on the related entity type could be the inverse.
    #[error("The inverse of the relationship `{key}` on `{entity_type}` is ambiguous.")]
    AmbiguousInverse { entity_type: String, key: String },
}

/// The error type for mapping records to and from a tree store.
#[derive(Debug, DeriveError)]
pub enum Error {
    /// The data uses an encoding which is not supported.
    #[error("{0}")]
    Unsupported(#[from] UnsupportedEncoding),

    /// The schema does not match the data or the operation.
    #[error("{0}")]
    SchemaMismatch(#[from] SchemaMismatch),

    /// An attribute declares a scalar type with no registered transform.
    #[error("There is no transform for the scalar type `{0}`.")]
    UnknownTransform(String),

    /// A value could not be converted by the transform for its scalar type.
    #[error("The value `{value}` is not a valid `{scalar_type}`.")]
    InvalidValue { scalar_type: String, value: String },

    /// A record was not found in the store.
    #[error("A record was not found.")]
    NotFound,

    /// An error occurred with the tree store.
    ///
    /// When this is returned from applying a patch, none of the patch was applied.
    #[error("{0}")]
    Store(anyhow::Error),
}

/// The result type for mapping records to and from a tree store.
pub type Result<T> = result::Result<T, Error>;
