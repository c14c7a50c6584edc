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

use std::error;

use super::node::TreeNode;
use super::patch::Patch;

/// A hierarchical key-value store addressed by paths.
///
/// Every path prefix in a `TreeStore` is itself a readable node which may have children. The store
/// has no notion of relationships; this library encodes them as plain values and sub-trees.
///
/// Tree stores are used as the storage backend for a [`Mapper`].
///
/// [`Mapper`]: crate::Mapper
pub trait TreeStore {
    /// The error type for this tree store.
    type Error: error::Error + Send + Sync + 'static;

    /// Return a view of the sub-tree rooted at `path`.
    ///
    /// If there is nothing stored at `path`, this returns a node for which
    /// [`TreeNode::exists`] is `false`.
    fn read(&mut self, path: &str) -> Result<TreeNode, Self::Error>;

    /// Apply every write in `patch`.
    ///
    /// Writing `Value::Null` to a path removes it and everything below it. If this method returns
    /// `Err` or panics, none of the writes are applied.
    ///
    /// This is an atomic operation.
    ///
    /// [`Value::Null`]: crate::Value::Null
    fn apply(&mut self, patch: &Patch) -> Result<(), Self::Error>;
}

impl<S: TreeStore + ?Sized> TreeStore for Box<S> {
    type Error = S::Error;

    fn read(&mut self, path: &str) -> Result<TreeNode, Self::Error> {
        self.as_mut().read(path)
    }

    fn apply(&mut self, patch: &Patch) -> Result<(), Self::Error> {
        self.as_mut().apply(patch)
    }
}

impl<S: TreeStore + ?Sized> TreeStore for &mut S {
    type Error = S::Error;

    fn read(&mut self, path: &str) -> Result<TreeNode, Self::Error> {
        (**self).read(path)
    }

    fn apply(&mut self, patch: &Patch) -> Result<(), Self::Error> {
        (**self).apply(patch)
    }
}
