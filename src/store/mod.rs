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

//! Backends for hierarchical key-value storage.
//!
//! This module provides the storage capability this library is built on, called a tree store. A
//! tree store provides only the most basic operations: reading the sub-tree at a path and
//! atomically applying a [`Patch`] of path-to-value writes. It has no notion of entities,
//! relationships, or joins; those are encoded on top of it by the [`Mapper`].
//!
//! All tree stores implement the [`TreeStore`] trait. Reads return a [`TreeNode`], which is an
//! owned, read-only view of the sub-tree at the time it was read.
//!
//! [`MemoryStore`] is provided out of the box and is mostly useful for testing.
//!
//! [`Mapper`]: crate::Mapper

pub use self::memory_store::{MemoryStore, MemoryStoreError};
pub use self::node::TreeNode;
pub use self::patch::{Iter, Patch};
pub use self::tree_store::TreeStore;

mod memory_store;
mod node;
mod patch;
mod tree_store;
