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

use graft_store::schema::{
    EntitySchema, Inverse, Registry, RelationshipKind, RelationshipMeta, RelationshipType,
};
use graft_store::SchemaMismatch;
use serde_json::json;
use common::*;

mod common;

#[rstest]
fn relationship_types_are_resolved(registry: Registry) -> anyhow::Result<()> {
    assert_that!(registry.relationship_type("comment", "post")?)
        .is_equal_to(RelationshipType::OneToMany);
    assert_that!(registry.relationship_type("post", "comments")?)
        .is_equal_to(RelationshipType::ManyToOne);
    assert_that!(registry.relationship_type("post", "tags")?)
        .is_equal_to(RelationshipType::ManyToNone);
    assert_that!(registry.relationship_type("user", "profile")?)
        .is_equal_to(RelationshipType::OneToOne);
    Ok(())
}

#[rstest]
fn registered_entity_types_are_listed(registry: Registry) {
    let mut entity_types = registry.entity_types().collect::<Vec<_>>();
    entity_types.sort_unstable();
    assert_that!(entity_types).is_equal_to(vec!["comment", "post", "profile", "tag", "user"]);
    assert_that!(registry.contains("post")).is_true();
    assert_that!(registry.contains("posts")).is_false();
}

#[rstest]
fn inverse_points_back(registry: Registry) -> anyhow::Result<()> {
    let inverse = registry.inverse_for("comment", "post")?;
    assert_that!(inverse.map(|inverse| inverse.key.as_str())).is_equal_to(Some("comments"));
    assert_that!(registry.inverse_for("post", "tags")?).is_none();
    Ok(())
}

#[test]
fn unknown_entity_type_errs() {
    let registry = Registry::builder()
        .entity(
            EntitySchema::new("comment").relationship(RelationshipMeta::belongs_to("post", "post")),
        )
        .build();
    assert_that!(registry).is_err_variant(
        SchemaMismatch::UnknownEntityType(String::from("post")).into(),
    );
}

#[rstest]
fn unknown_field_errs(registry: Registry) {
    assert_that!(registry.relationship("post", "editor")).is_err_message(
        "The entity type `post` has no field `editor`.",
    );
}

#[test]
fn named_inverse_must_point_back() {
    let registry = Registry::builder()
        .entity(
            EntitySchema::new("comment")
                .relationship(RelationshipMeta::belongs_to("post", "post").inverse("replies")),
        )
        .entity(
            EntitySchema::new("post")
                .relationship(RelationshipMeta::has_many("comments", "comment")),
        )
        .build();
    assert_that!(registry).is_err_message(
        "The relationship `post` on `comment` has no inverse.",
    );
}

#[test]
fn named_inverse_disambiguates() -> anyhow::Result<()> {
    let registry = Registry::builder()
        .entity(
            EntitySchema::new("post")
                .relationship(RelationshipMeta::belongs_to("author", "user").inverse("posts"))
                .relationship(RelationshipMeta::belongs_to("editor", "user").no_inverse()),
        )
        .entity(EntitySchema::new("user").relationship(RelationshipMeta::has_many("posts", "post")))
        .build()?;

    assert_that!(registry.relationship_type("post", "author")?)
        .is_equal_to(RelationshipType::OneToMany);
    assert_that!(registry.relationship_type("post", "editor")?)
        .is_equal_to(RelationshipType::OneToNone);
    assert_that!(registry
        .inverse_for("user", "posts")?
        .map(|inverse| inverse.key.as_str()))
    .is_equal_to(Some("author"));
    Ok(())
}

#[test]
fn ambiguous_inverse_errs_on_lookup() -> anyhow::Result<()> {
    let registry = Registry::builder()
        .entity(
            EntitySchema::new("post")
                .relationship(RelationshipMeta::belongs_to("author", "user"))
                .relationship(RelationshipMeta::belongs_to("editor", "user")),
        )
        .entity(EntitySchema::new("user").relationship(RelationshipMeta::has_many("posts", "post")))
        .build()?;

    assert_that!(registry.inverse_for("user", "posts")).is_err_message(
        "The inverse of the relationship `posts` on `user` is ambiguous.",
    );
    Ok(())
}

#[test]
fn self_referential_relationships_do_not_mirror_themselves() -> anyhow::Result<()> {
    let registry = Registry::builder()
        .entity(
            EntitySchema::new("user")
                .relationship(RelationshipMeta::belongs_to("mentor", "user").inverse("mentees"))
                .relationship(RelationshipMeta::has_many("mentees", "user").inverse("mentor"))
                .relationship(RelationshipMeta::has_many("friends", "user").no_inverse()),
        )
        .build()?;

    assert_that!(registry.relationship_type("user", "mentor")?)
        .is_equal_to(RelationshipType::OneToMany);
    assert_that!(registry.relationship_type("user", "mentees")?)
        .is_equal_to(RelationshipType::ManyToOne);
    assert_that!(registry.relationship_type("user", "friends")?)
        .is_equal_to(RelationshipType::ManyToNone);
    Ok(())
}

#[test]
fn relationship_kinds_parse() -> anyhow::Result<()> {
    assert_that!("belongsTo".parse::<RelationshipKind>()?).is_equal_to(RelationshipKind::Singular);
    assert_that!("hasMany".parse::<RelationshipKind>()?)
        .is_equal_to(RelationshipKind::Collection);
    assert_that!("manyToMany".parse::<RelationshipKind>())
        .is_err_message("`manyToMany` is not a relationship kind.");
    Ok(())
}

#[test]
fn relationships_default_to_automatic_inverse() {
    assert_that!(RelationshipMeta::belongs_to("post", "post").inverse).is_equal_to(Inverse::Auto);
    assert_that!(RelationshipMeta::has_many("tags", "tag").no_inverse().inverse)
        .is_equal_to(Inverse::None);
}

#[test]
fn relationship_kinds_deserialize_from_either_name() -> anyhow::Result<()> {
    let author: RelationshipMeta = serde_json::from_value(json!({
        "key": "author",
        "kind": "belongsTo",
        "target_type": "user",
    }))?;
    assert_that!(author.kind).is_equal_to(RelationshipKind::Singular);
    assert_that!(author.inverse).is_equal_to(Inverse::Auto);

    let kinds: Vec<RelationshipKind> =
        serde_json::from_value(json!(["hasMany", "collection", "singular"]))?;
    assert_that!(kinds).is_equal_to(vec![
        RelationshipKind::Collection,
        RelationshipKind::Collection,
        RelationshipKind::Singular,
    ]);
    Ok(())
}
