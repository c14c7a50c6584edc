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

//! `graft-store` maps records of an object graph onto a hierarchical key-value store.
//!
//! A tree store addresses every value by a slash-separated path and knows nothing about entities
//! or relationships. This crate encodes records and the references between them as plain values
//! and sub-trees so that they can be read back as normalized records and written as a single
//! atomic patch.
//!
//! The main types are:
//! - [`Mapper`] ties together the schemas, paths, transforms, and key configuration. It reads
//! records from and writes records to any [`TreeStore`].
//! - [`Serializer`] reads and writes the records of a single entity type.
//! - [`Registry`] holds the [`EntitySchema`] of every entity type and resolves which relationship
//! mirrors which.
//! - [`RecordSnapshot`] is what a record looks like when it is written, including which fields
//! changed since it was last persisted.
//!
//! When a singular relationship is mirrored by a collection on the related entity type, writing
//! the record also writes its membership in the related record's collection and retracts its
//! membership from the collection it previously belonged to. All of those writes are part of the
//! same patch.
//!
//! # Examples
//! ```
//! use graft_store::{Mapper, RecordSnapshot, Snapshot, Value};
//! use graft_store::schema::{AttributeMeta, EntitySchema, Registry, RelationshipMeta};
//! use graft_store::serializer::Linkage;
//! use graft_store::store::MemoryStore;
//!
//! fn main() -> graft_store::Result<()> {
//!     // Describe the entity types and how they relate to each other.
//!     let post = EntitySchema::new("post")
//!         .attribute(AttributeMeta::typed("title", "string"))
//!         .relationship(RelationshipMeta::has_many("comments", "comment"));
//!     let comment = EntitySchema::new("comment")
//!         .attribute(AttributeMeta::new("body"))
//!         .relationship(RelationshipMeta::belongs_to("post", "post"));
//!     let registry = Registry::builder().entity(post).entity(comment).build()?;
//!
//!     let mapper = Mapper::new(registry);
//!     let mut store = MemoryStore::new();
//!
//!     // Write a post and a comment which belongs to it.
//!     mapper.save(&mut store, &Snapshot::new("post", "p1").attr("title", "Hello"))?;
//!     let comment = Snapshot::new("comment", "c1")
//!         .attr("body", "First!")
//!         .belongs_to("post", Some("p1"));
//!     let patch = mapper.save(&mut store, &comment)?;
//!
//!     // Saving the comment also added it to the post's comments.
//!     assert_eq!(patch.get("/posts/p1/comments/c1"), Some(&Value::Bool(true)));
//!
//!     // Read the post back.
//!     let document = mapper.find_record(&mut store, "post", "p1")?;
//!     let post = &document.records()[0];
//!     assert_eq!(post.attributes["title"], Value::from("Hello"));
//!     match &post.relationships["comments"].data {
//!         Linkage::Many(comments) => assert_eq!(comments[0].id, comment.id()),
//!         _ => unreachable!(),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//! Some functionality is gated behind cargo features:
//!
//! Type | Cargo Feature
//! --- | ---
//! `DateTransform` | `transform-date`
//!
//! The `transform-date` feature is enabled by default.
//!
//! [`Serializer`]: crate::serializer::Serializer
//! [`Registry`]: crate::schema::Registry
//! [`EntitySchema`]: crate::schema::EntitySchema
//! [`TreeStore`]: crate::store::TreeStore

pub use error::{Error, Result, SchemaMismatch, UnsupportedEncoding};
pub use mapper::{Mapper, MapperBuilder};
pub use record::{RecordSnapshot, Snapshot};
pub use value::Value;

mod error;
mod mapper;
mod record;
pub mod schema;
pub mod serializer;
pub mod store;
mod value;
