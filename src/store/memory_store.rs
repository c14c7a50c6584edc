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

use std::cmp::Ordering;
use std::collections::BTreeMap;

use relative_path::{Component, RelativePath};
use static_assertions::assert_impl_all;
use thiserror::Error as DeriveError;

use super::node::TreeNode;
use super::patch::Patch;
use super::tree_store::TreeStore;
use crate::value::Value;

/// The error type for a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, DeriveError)]
pub enum MemoryStoreError {
    /// The path has a segment which is not a plain key.
    #[error("The path `{0}` is not valid.")]
    InvalidPath(String),

    /// A patch writes both to a path and to a path below it.
    #[error("The path `{ancestor}` is an ancestor of `{descendant}` in the same patch.")]
    OverlappingPaths {
        ancestor: String,
        descendant: String,
    },
}

/// Split `path` into its segments.
///
/// A leading `/` is ignored, so absolute and relative paths address the same node.
fn segments(path: &str) -> Result<Vec<String>, MemoryStoreError> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if !trimmed.is_empty() && trimmed.split('/').any(str::is_empty) {
        return Err(MemoryStoreError::InvalidPath(path.to_owned()));
    }

    RelativePath::new(trimmed)
        .components()
        .map(|component| match component {
            Component::Normal(name) => Ok(name.to_owned()),
            _ => Err(MemoryStoreError::InvalidPath(path.to_owned())),
        })
        .collect()
}

/// The order in which siblings are listed.
///
/// Keys which are integers come first in numeric order, followed by all other keys in
/// lexicographic order. This keeps lists in index order.
fn key_order(left: &str, right: &str) -> Ordering {
    match (left.parse::<i64>(), right.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => left.cmp(right),
    }
}

/// A node in a `MemoryStore`.
#[derive(Debug, Clone, Default, PartialEq)]
struct StoreNode {
    /// The value if this is a leaf.
    value: Option<Value>,

    /// The children if this is a branch.
    children: BTreeMap<String, StoreNode>,
}

impl StoreNode {
    fn from_value(value: Value) -> StoreNode {
        match value {
            Value::Null => StoreNode::default(),
            Value::List(values) => StoreNode {
                value: None,
                children: values
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| (index.to_string(), StoreNode::from_value(value)))
                    .filter(|(_, node)| !node.is_empty())
                    .collect(),
            },
            value => StoreNode {
                value: Some(value),
                children: BTreeMap::new(),
            },
        }
    }

    fn from_json(value: serde_json::Value) -> StoreNode {
        match value {
            serde_json::Value::Object(map) => StoreNode {
                value: None,
                children: map
                    .into_iter()
                    .map(|(key, value)| (key, StoreNode::from_json(value)))
                    .filter(|(_, node)| !node.is_empty())
                    .collect(),
            },
            serde_json::Value::Array(values) => StoreNode {
                value: None,
                children: values
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| (index.to_string(), StoreNode::from_json(value)))
                    .filter(|(_, node)| !node.is_empty())
                    .collect(),
            },
            value => StoreNode::from_value(Value::from(value)),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match &self.value {
            Some(value) => serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            None if self.children.is_empty() => serde_json::Value::Null,
            None => serde_json::Value::Object(
                self.children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
        }
    }

    fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    fn get(&self, segments: &[String]) -> Option<&StoreNode> {
        let mut current = self;
        for segment in segments {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    /// Write `value` at the path given by `segments` relative to this node.
    ///
    /// Writing `Null` removes the node and then any ancestors left empty.
    fn write(&mut self, segments: &[String], value: Value) {
        match segments.split_first() {
            None => *self = StoreNode::from_value(value),
            Some((first, rest)) => {
                if value.is_null() {
                    if let Some(child) = self.children.get_mut(first) {
                        child.write(rest, value);
                        if child.is_empty() {
                            self.children.remove(first);
                        }
                    }
                    return;
                }

                // A leaf becomes a branch when something is written below it.
                self.value = None;
                let child = self.children.entry(first.clone()).or_default();
                child.write(rest, value);
                if child.is_empty() {
                    self.children.remove(first);
                }
            }
        }
    }

    fn to_tree_node(&self, key: &str) -> TreeNode {
        if self.is_empty() {
            return TreeNode::missing(key);
        }

        match &self.value {
            Some(value) => TreeNode::leaf(key, value.clone()),
            None => {
                let mut keys = self.children.keys().collect::<Vec<_>>();
                keys.sort_by(|left, right| key_order(left, right));
                TreeNode::branch(
                    key,
                    keys.into_iter()
                        .map(|child_key| self.children[child_key].to_tree_node(child_key)),
                )
            }
        }
    }
}

/// A `TreeStore` which stores data in memory.
///
/// Unlike a remote tree store, data in a `MemoryStore` is only accessible to the current process.
/// This tree store is useful for testing.
///
/// Children are listed with integer keys first in numeric order and all other keys in
/// lexicographic order. Writing an empty list or `Value::Null` removes the path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    root: StoreNode,
}

assert_impl_all!(MemoryStore: TreeStore, Send, Sync);

impl MemoryStore {
    /// Create a new empty `MemoryStore`.
    pub fn new() -> Self {
        MemoryStore {
            root: StoreNode::default(),
        }
    }

    /// Create a `MemoryStore` which contains the given JSON document.
    ///
    /// JSON objects become branches and everything else becomes a leaf. Arrays become branches
    /// keyed by index, the same way a `Value::List` is written, and their elements may themselves
    /// be objects.
    pub fn from_json(document: serde_json::Value) -> Self {
        MemoryStore {
            root: StoreNode::from_json(document),
        }
    }

    /// Return the contents of this store as a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }

    /// Return the value of the leaf at `path`.
    ///
    /// This returns `None` if there is nothing at `path` or if it is a branch.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = segments(path).ok()?;
        self.root.get(&segments)?.value.as_ref()
    }
}

impl TreeStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read(&mut self, path: &str) -> Result<TreeNode, Self::Error> {
        let segments = segments(path)?;
        let key = segments.last().map(String::as_str).unwrap_or("");
        Ok(match self.root.get(&segments) {
            Some(node) => node.to_tree_node(key),
            None => TreeNode::missing(key),
        })
    }

    fn apply(&mut self, patch: &Patch) -> Result<(), Self::Error> {
        let mut writes = Vec::with_capacity(patch.len());
        for (path, value) in patch {
            writes.push((segments(path)?, path, value));
        }

        // Any ancestor sorts directly before one of its descendants.
        let mut sorted = writes
            .iter()
            .map(|(segments, path, _)| (segments, *path))
            .collect::<Vec<_>>();
        sorted.sort();
        for pair in sorted.windows(2) {
            let (ancestor, ancestor_path) = pair[0];
            let (descendant, descendant_path) = pair[1];
            if descendant.starts_with(ancestor) {
                return Err(MemoryStoreError::OverlappingPaths {
                    ancestor: ancestor_path.to_owned(),
                    descendant: descendant_path.to_owned(),
                });
            }
        }

        let mut root = self.root.clone();
        for (segments, _, value) in writes {
            root.write(&segments, value.clone());
        }
        self.root = root;

        Ok(())
    }
}
