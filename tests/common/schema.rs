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

use rstest::*;

use graft_store::schema::{AttributeMeta, EntitySchema, Registry, RelationshipMeta};
use graft_store::store::MemoryStore;
use graft_store::Mapper;

/// The schema of a post.
///
/// A post has many comments and belongs to an author, and both are mirrored on the other end. Its
/// tags are not mirrored.
pub fn post_schema() -> EntitySchema {
    EntitySchema::new("post")
        .attribute(AttributeMeta::typed("title", "string"))
        .attribute(AttributeMeta::typed("views", "number"))
        .attribute(AttributeMeta::typed("draft", "boolean"))
        .relationship(RelationshipMeta::has_many("comments", "comment"))
        .relationship(RelationshipMeta::belongs_to("author", "user"))
        .relationship(RelationshipMeta::has_many("tags", "tag"))
}

/// The schema of a comment, which belongs to a post.
pub fn comment_schema() -> EntitySchema {
    EntitySchema::new("comment")
        .attribute(AttributeMeta::new("body"))
        .relationship(RelationshipMeta::belongs_to("post", "post"))
}

/// The schema of a user, who has many posts and one profile.
pub fn user_schema() -> EntitySchema {
    EntitySchema::new("user")
        .attribute(AttributeMeta::new("name"))
        .relationship(RelationshipMeta::has_many("posts", "post"))
        .relationship(RelationshipMeta::belongs_to("profile", "profile"))
}

/// The schema of a profile, which belongs to exactly one user.
pub fn profile_schema() -> EntitySchema {
    EntitySchema::new("profile")
        .attribute(AttributeMeta::new("bio"))
        .relationship(RelationshipMeta::belongs_to("user", "user"))
}

/// The schema of a tag, which does not point back at posts.
pub fn tag_schema() -> EntitySchema {
    EntitySchema::new("tag").attribute(AttributeMeta::new("label"))
}

/// The registry with every entity type of a small blog.
pub fn blog_registry() -> Registry {
    Registry::builder()
        .entity(post_schema())
        .entity(comment_schema())
        .entity(user_schema())
        .entity(profile_schema())
        .entity(tag_schema())
        .build()
        .unwrap()
}

#[fixture]
pub fn registry() -> Registry {
    blog_registry()
}

#[fixture]
pub fn mapper() -> Mapper {
    Mapper::new(blog_registry())
}

#[fixture]
pub fn store() -> MemoryStore {
    MemoryStore::new()
}
