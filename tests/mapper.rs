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

use maplit::btreemap;
use thiserror::Error as DeriveError;

use graft_store::schema::Registry;
use graft_store::serializer::{DocumentData, PathBuilder, SerializerConfig};
use graft_store::store::{MemoryStore, Patch, TreeNode, TreeStore};
use graft_store::{Mapper, Snapshot, Value};
use common::*;

mod common;

#[rstest]
fn saved_records_can_be_found(mapper: Mapper, mut store: MemoryStore) -> anyhow::Result<()> {
    let post = Snapshot::new("post", "p1")
        .attr("title", "Hello")
        .attr("views", 3)
        .attr("draft", true)
        .belongs_to("author", Some("u1"))
        .has_many("tags", vec!["t1"]);
    mapper.save(&mut store, &post)?;

    let document = mapper.find_record(&mut store, "post", "p1")?;
    let record = &document.records()[0];

    assert_that!(record.attributes).is_equal_to(btreemap! {
        String::from("title") => Value::from("Hello"),
        String::from("views") => Value::Integer(3),
        String::from("draft") => Value::Bool(true),
    });
    assert_that!(record
        .relationships
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>())
        .is_equal_to(vec!["author", "tags"]);

    let author = mapper.find_record(&mut store, "user", "u1")?;
    let posts = serde_json::to_value(&author.records()[0].relationships["posts"])?;
    assert_that!(posts).is_equal_to(serde_json::json!({
        "data": [{ "id": "p1", "type": "post" }],
    }));
    Ok(())
}

#[rstest]
fn skipped_attributes_are_not_round_tripped(
    registry: Registry,
    mut store: MemoryStore,
) -> anyhow::Result<()> {
    let mapper = Mapper::builder(registry)
        .serializer("user", SerializerConfig::new().skip("name"))
        .build();

    let user = Snapshot::new("user", "u1")
        .attr("name", "Ada")
        .belongs_to("profile", Some("pr1"));
    let patch = mapper.save(&mut store, &user)?;
    let document = mapper.find_record(&mut store, "user", "u1")?;

    assert_that!(patch.contains("/users/u1/name")).is_false();
    assert_that!(document.records()[0].attributes.contains_key("name")).is_false();
    Ok(())
}

#[rstest]
fn missing_records_are_not_found(mapper: Mapper, mut store: MemoryStore) {
    assert_that!(mapper.find_record(&mut store, "post", "p1"))
        .is_err_variant(graft_store::Error::NotFound);
}

#[rstest]
fn find_all_returns_every_record(mapper: Mapper, mut store: MemoryStore) -> anyhow::Result<()> {
    assert_that!(mapper.find_all(&mut store, "tag")?.records().len()).is_equal_to(0);

    for id in ["t1", "t2", "t3"] {
        mapper.save(&mut store, &Snapshot::new("tag", id).attr("label", id))?;
    }
    let document = mapper.find_all(&mut store, "tag")?;

    assert_that!(matches!(document.data, DocumentData::Many(_))).is_true();
    assert_that!(document
        .records()
        .iter()
        .map(|record| record.attributes["label"].clone())
        .collect::<Vec<_>>())
    .is_equal_to(vec![
        Value::from("t1"),
        Value::from("t2"),
        Value::from("t3"),
    ]);
    Ok(())
}

#[rstest]
fn unknown_entity_types_err(mapper: Mapper, mut store: MemoryStore) {
    assert_that!(mapper.find_all(&mut store, "page"))
        .is_err_message("There is no schema for the entity type `page`.");
}

#[derive(Debug)]
struct PrefixedPaths(&'static str);

impl PathBuilder for PrefixedPaths {
    fn collection_path_for(&self, entity_type: &str) -> String {
        format!("/{}/{}", self.0, entity_type)
    }
}

#[rstest]
fn custom_path_builders_are_used(registry: Registry, mut store: MemoryStore) -> anyhow::Result<()> {
    let mapper = Mapper::builder(registry)
        .path_builder(PrefixedPaths("blog"))
        .build();

    let comment = Snapshot::new("comment", "c1").belongs_to("post", Some("p1"));
    let patch = mapper.save(&mut store, &comment)?;

    assert_that!(patch.paths().collect::<Vec<_>>()).is_equal_to(vec![
        "/blog/comment/c1/body",
        "/blog/comment/c1/post",
        "/blog/post/p1/comments/c1",
    ]);
    assert_that!(mapper.find_record(&mut store, "post", "p1")).is_ok();
    Ok(())
}

#[derive(Debug, DeriveError)]
#[error("The store is offline.")]
struct Offline;

/// A store which fails every operation.
#[derive(Debug, Default)]
struct OfflineStore {
    attempts: usize,
}

impl TreeStore for OfflineStore {
    type Error = Offline;

    fn read(&mut self, _path: &str) -> Result<TreeNode, Self::Error> {
        self.attempts += 1;
        Err(Offline)
    }

    fn apply(&mut self, _patch: &Patch) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err(Offline)
    }
}

#[rstest]
fn store_errors_are_propagated(mapper: Mapper) {
    let mut store = OfflineStore::default();

    assert_that!(mapper.save(&mut store, &Snapshot::new("tag", "t1")))
        .is_err_message("The store is offline.");
    assert_that!(mapper.find_all(&mut store, "tag")).is_err_variant(graft_store::Error::Store(
        anyhow::anyhow!("The store is offline."),
    ));
    assert_that!(store.attempts).is_equal_to(2);
}

#[rstest]
fn nothing_is_applied_when_serializing_fails(mapper: Mapper) {
    let mut store = OfflineStore::default();

    assert_that!(mapper.save(&mut store, &Snapshot::new("page", "1"))).is_err();
    assert_that!(store.attempts).is_equal_to(0);
}
