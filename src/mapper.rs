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

use tracing::debug;

use crate::error::Error;
use crate::record::RecordSnapshot;
use crate::schema::Registry;
use crate::serializer::{
    DefaultPathBuilder, Document, MapperConfig, PathBuilder, Serializer, SerializerConfig,
    Transform, Transforms,
};
use crate::store::{Patch, TreeStore};

fn store_error(error: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Store(anyhow::Error::new(error))
}

/// Maps records onto a [`TreeStore`].
///
/// A `Mapper` ties together the schemas of every entity type, where their records are stored, how
/// their attributes are transformed, and how their fields are named. It hands out a [`Serializer`]
/// for each entity type and provides the operations which read from and write to a store.
///
/// A `Mapper` does not hold a store. The same mapper can be used with any number of stores.
///
/// # Examples
/// ```
/// use graft_store::{Mapper, Snapshot};
/// use graft_store::schema::{EntitySchema, Registry, RelationshipMeta};
/// use graft_store::store::MemoryStore;
///
/// # fn main() -> graft_store::Result<()> {
/// let post = EntitySchema::new("post")
///     .relationship(RelationshipMeta::has_many("comments", "comment"));
/// let comment = EntitySchema::new("comment")
///     .relationship(RelationshipMeta::belongs_to("post", "post"));
/// let registry = Registry::builder().entity(post).entity(comment).build()?;
/// let mapper = Mapper::new(registry);
/// let mut store = MemoryStore::new();
///
/// let snapshot = Snapshot::new("comment", "c1").belongs_to("post", Some("p1"));
/// mapper.save(&mut store, &snapshot)?;
///
/// let post = mapper.find_record(&mut store, "post", "p1")?;
/// assert_eq!(post.records()[0].id, "p1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Mapper {
    registry: Registry,
    paths: Box<dyn PathBuilder>,
    transforms: Transforms,
    serializers: HashMap<String, SerializerConfig>,
    default_serializer: SerializerConfig,
    config: MapperConfig,
}

impl Mapper {
    /// Return a mapper for the entity types in `registry` with the default configuration.
    pub fn new(registry: Registry) -> Self {
        Self::builder(registry).build()
    }

    /// Return a builder for a mapper for the entity types in `registry`.
    pub fn builder(registry: Registry) -> MapperBuilder {
        MapperBuilder {
            registry,
            paths: None,
            transforms: Transforms::default(),
            serializers: HashMap::new(),
            config: MapperConfig::default(),
        }
    }

    /// The schemas of every entity type.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Where the records of each entity type are stored.
    pub fn paths(&self) -> &dyn PathBuilder {
        self.paths.as_ref()
    }

    /// The transform for each scalar type.
    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// The configuration for this mapper.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Return the serializer for `entity_type`.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    pub fn serializer_for(&self, entity_type: &str) -> crate::Result<Serializer<'_>> {
        let schema = self.registry.schema_for(entity_type)?;
        let config = self
            .serializers
            .get(entity_type)
            .unwrap_or(&self.default_serializer);
        Ok(Serializer::new(self, schema, config))
    }

    /// Build the patch which writes the record `snapshot` at its root path.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for the record's entity type.
    /// - Any error returned by [`Serializer::serialize`].
    pub fn serialize<S>(&self, snapshot: &S) -> crate::Result<Patch>
    where
        S: RecordSnapshot + ?Sized,
    {
        let path = self
            .paths
            .root_path_for(snapshot.entity_type(), snapshot.id());
        self.serializer_for(snapshot.entity_type())?
            .serialize(snapshot, &path)
    }

    /// Write the record `snapshot` to `store` and return the patch which was applied.
    ///
    /// The patch is applied in a single call to [`TreeStore::apply`], so either every write is
    /// made or none of them are. Nothing is written if the patch cannot be built.
    ///
    /// # Errors
    /// - `Error::Store`: The store returned an error.
    /// - Any error returned by [`Mapper::serialize`].
    pub fn save<T, S>(&self, store: &mut T, snapshot: &S) -> crate::Result<Patch>
    where
        T: TreeStore + ?Sized,
        S: RecordSnapshot + ?Sized,
    {
        let patch = self.serialize(snapshot)?;
        store.apply(&patch).map_err(store_error)?;
        debug!(
            entity_type = snapshot.entity_type(),
            id = snapshot.id(),
            entries = patch.len(),
            "saved record"
        );
        Ok(patch)
    }

    /// Read the record `id` of `entity_type` from `store`.
    ///
    /// # Errors
    /// - `Error::NotFound`: There is no record `id` in the store.
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    /// - `Error::Unsupported`: The record uses an encoding which is not supported.
    /// - `Error::Store`: The store returned an error.
    pub fn find_record<T>(
        &self,
        store: &mut T,
        entity_type: &str,
        id: &str,
    ) -> crate::Result<Document>
    where
        T: TreeStore + ?Sized,
    {
        let serializer = self.serializer_for(entity_type)?;
        let path = self.paths.root_path_for(entity_type, id);
        let node = store.read(&path).map_err(store_error)?;
        if !node.exists() {
            debug!(entity_type, id, %path, "record not found");
            return Err(Error::NotFound);
        }
        serializer.normalize(&node)
    }

    /// Read every record of `entity_type` from `store`.
    ///
    /// If there are no records of `entity_type`, this returns a document with no records.
    ///
    /// # Errors
    /// - `SchemaMismatch::UnknownEntityType`: There is no schema for `entity_type`.
    /// - `Error::Unsupported`: A record uses an encoding which is not supported.
    /// - `Error::Store`: The store returned an error.
    pub fn find_all<T>(&self, store: &mut T, entity_type: &str) -> crate::Result<Document>
    where
        T: TreeStore + ?Sized,
    {
        let serializer = self.serializer_for(entity_type)?;
        let path = self.paths.collection_path_for(entity_type);
        let node = store.read(&path).map_err(store_error)?;
        serializer.normalize_array_response(&node)
    }
}

/// A builder for a [`Mapper`].
///
/// This value is created by [`Mapper::builder`].
#[derive(Debug)]
pub struct MapperBuilder {
    registry: Registry,
    paths: Option<Box<dyn PathBuilder>>,
    transforms: Transforms,
    serializers: HashMap<String, SerializerConfig>,
    config: MapperConfig,
}

impl MapperBuilder {
    /// Locate records with `paths` instead of [`DefaultPathBuilder`].
    pub fn path_builder(mut self, paths: impl PathBuilder + 'static) -> Self {
        self.paths = Some(Box::new(paths));
        self
    }

    /// Use `transform` for attributes of the scalar type `name`.
    ///
    /// This replaces any transform already registered for `name`, including the built-in ones.
    pub fn transform(
        mut self,
        name: impl Into<String>,
        transform: impl Transform + 'static,
    ) -> Self {
        self.transforms.register(name, transform);
        self
    }

    /// Use `transforms` instead of the built-in transforms.
    pub fn transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    /// Configure the serializer for `entity_type`.
    ///
    /// Entity types with no configuration write every field under its formatted key.
    pub fn serializer(mut self, entity_type: impl Into<String>, config: SerializerConfig) -> Self {
        self.serializers.insert(entity_type.into(), config);
        self
    }

    /// Use `config` instead of the default configuration.
    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the mapper.
    pub fn build(self) -> Mapper {
        Mapper {
            registry: self.registry,
            paths: self
                .paths
                .unwrap_or_else(|| Box::new(DefaultPathBuilder)),
            transforms: self.transforms,
            serializers: self.serializers,
            default_serializer: SerializerConfig::default(),
            config: self.config,
        }
    }
}
