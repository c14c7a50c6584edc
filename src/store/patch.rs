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
use std::iter::{ExactSizeIterator, FusedIterator};
use std::slice;
use std::vec;

use serde::{Serialize, Serializer};

use crate::value::Value;

/// A set of writes to a [`TreeStore`] which are applied atomically.
///
/// A `Patch` maps absolute paths to values. Entries are kept in the order their paths were first
/// inserted. Inserting a path which is already in the patch replaces its value but keeps its
/// position.
///
/// [`TreeStore`]: crate::store::TreeStore
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Patch {
    /// Return a new empty `Patch`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value at `path`.
    ///
    /// This returns the value previously set at `path`, if there was one.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let path = path.into();
        let value = value.into();
        match self.index.get(&path) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, value));
                None
            }
        }
    }

    /// Return the value set at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.index
            .get(path)
            .map(|&position| &self.entries[position].1)
    }

    /// Return whether a value is set at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Return the number of paths in this patch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether this patch is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return an iterator over the paths and values in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Return the paths in this patch in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }
}

/// An iterator over the entries in a [`Patch`].
///
/// This value is created by [`Patch::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(slice::Iter<'a, (String, Value)>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(path, value)| (path.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> FusedIterator for Iter<'a> {}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a Patch {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Patch {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P: Into<String>, V: Into<Value>> FromIterator<(P, V)> for Patch {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut patch = Patch::new();
        for (path, value) in iter {
            patch.insert(path, value);
        }
        patch
    }
}

// A patch is sent to a store as a single JSON object.
impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
