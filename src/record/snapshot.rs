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

use std::collections::{HashMap, HashSet};

use crate::value::Value;

/// A frozen view of an in-memory record at the time it is serialized.
///
/// Change tracking belongs to whatever owns the record. A snapshot only reports whether a field
/// changed since the record was last persisted and, for singular relationships, what it pointed
/// at before.
pub trait RecordSnapshot {
    /// The id of the record.
    fn id(&self) -> &str;

    /// The entity type of the record.
    fn entity_type(&self) -> &str;

    /// Return the current value of the attribute `key`.
    ///
    /// An attribute which was never set is `Value::Null`.
    fn attr(&self, key: &str) -> Value;

    /// Return the id of the entity the singular relationship `key` points at.
    fn belongs_to_id(&self, key: &str) -> Option<String>;

    /// Return the ids of the entities the collection relationship `key` points at.
    ///
    /// This returns `None` if the relationship is not loaded, which is different from empty.
    fn has_many_ids(&self, key: &str) -> Option<Vec<String>>;

    /// Return whether the field `key` changed since the record was last persisted.
    fn did_field_change(&self, key: &str) -> bool;

    /// Return the id the singular relationship `key` pointed at when the record was last persisted.
    fn previous_related_id(&self, key: &str) -> Option<String>;
}

/// A [`RecordSnapshot`] which holds its values directly.
///
/// # Examples
/// ```
/// use graft_store::{RecordSnapshot, Snapshot};
///
/// let snapshot = Snapshot::new("comment", "c1")
///     .attr("body", "First!")
///     .belongs_to("post", Some("p2"))
///     .changed_from("post", "p1");
///
/// assert_eq!(snapshot.belongs_to_id("post").as_deref(), Some("p2"));
/// assert!(snapshot.did_field_change("post"));
/// assert_eq!(snapshot.previous_related_id("post").as_deref(), Some("p1"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    id: String,
    entity_type: String,
    attributes: HashMap<String, Value>,
    belongs_to: HashMap<String, Option<String>>,
    has_many: HashMap<String, Vec<String>>,
    changed: HashSet<String>,
    previous: HashMap<String, String>,
}

impl Snapshot {
    /// Return a snapshot of the record `id` of `entity_type` with no fields set.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Snapshot {
            id: id.into(),
            entity_type: entity_type.into(),
            ..Snapshot::default()
        }
    }

    /// Set the attribute `key`.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Point the singular relationship `key` at `id`, or clear it with `None`.
    pub fn belongs_to<T: Into<String>>(mut self, key: impl Into<String>, id: Option<T>) -> Self {
        self.belongs_to.insert(key.into(), id.map(Into::into));
        self
    }

    /// Point the collection relationship `key` at `ids`.
    pub fn has_many<T: Into<String>>(
        mut self,
        key: impl Into<String>,
        ids: impl IntoIterator<Item = T>,
    ) -> Self {
        self.has_many
            .insert(key.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the field `key` as changed since the record was last persisted.
    pub fn changed(mut self, key: impl Into<String>) -> Self {
        self.changed.insert(key.into());
        self
    }

    /// Mark the singular relationship `key` as changed from pointing at `previous_id`.
    pub fn changed_from(mut self, key: impl Into<String>, previous_id: impl Into<String>) -> Self {
        let key = key.into();
        self.previous.insert(key.clone(), previous_id.into());
        self.changed.insert(key);
        self
    }

    /// Mark every field as persisted.
    ///
    /// This is what the owner of a record does once a patch built from it has been applied.
    pub fn persisted(mut self) -> Self {
        self.changed.clear();
        self.previous.clear();
        self
    }
}

impl RecordSnapshot for Snapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn attr(&self, key: &str) -> Value {
        self.attributes.get(key).cloned().unwrap_or_default()
    }

    fn belongs_to_id(&self, key: &str) -> Option<String> {
        self.belongs_to.get(key).cloned().flatten()
    }

    fn has_many_ids(&self, key: &str) -> Option<Vec<String>> {
        self.has_many.get(key).cloned()
    }

    fn did_field_change(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    fn previous_related_id(&self, key: &str) -> Option<String> {
        self.previous.get(key).cloned()
    }
}
