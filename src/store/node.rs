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

use std::slice;

use crate::value::Value;

/// A read-only view of a sub-tree of a [`TreeStore`].
///
/// A node is either a leaf with a value or a branch with children. The key of a node is the last
/// segment of its path, which is also the id of the entity when the node is an entity root.
///
/// Nodes are created for a single read and are not kept in sync with the store.
///
/// [`TreeStore`]: crate::store::TreeStore
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    key: String,
    exists: bool,
    value: Option<Value>,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Return a leaf node with the given `key` and `value`.
    pub fn leaf(key: impl Into<String>, value: impl Into<Value>) -> Self {
        TreeNode {
            key: key.into(),
            exists: true,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Return a branch node with the given `key` and `children`.
    ///
    /// The children are kept in the order they are given.
    pub fn branch(key: impl Into<String>, children: impl IntoIterator<Item = TreeNode>) -> Self {
        TreeNode {
            key: key.into(),
            exists: true,
            value: None,
            children: children.into_iter().collect(),
        }
    }

    /// Return a node for a path which does not exist in the store.
    pub fn missing(key: impl Into<String>) -> Self {
        TreeNode {
            key: key.into(),
            exists: false,
            value: None,
            children: Vec::new(),
        }
    }

    /// The last segment of this node's path.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return whether this node exists in the store.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// The value of this node if it is a leaf.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Return whether this node has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Return the child with the given `key`.
    pub fn child(&self, key: &str) -> Option<&TreeNode> {
        self.children.iter().find(|child| child.key == key)
    }

    /// Return an iterator over the children of this node in store order.
    pub fn children(&self) -> slice::Iter<'_, TreeNode> {
        self.children.iter()
    }
}
