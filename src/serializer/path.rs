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

use std::fmt::Debug;

use super::config::KeyFormat;

/// Locates the records of each entity type in a tree store.
pub trait PathBuilder: Debug + Send + Sync {
    /// Return the path of the node whose children are all the records of `entity_type`.
    fn collection_path_for(&self, entity_type: &str) -> String;

    /// Return the path of the root of the record `id` of `entity_type`.
    fn root_path_for(&self, entity_type: &str, id: &str) -> String {
        format!("{}/{}", self.collection_path_for(entity_type), id)
    }
}

/// Stores each entity type under the camel-cased plural of its name.
///
/// The records of `blog-post` are stored under `/blogPosts`, so the record `p1` has the root
/// `/blogPosts/p1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultPathBuilder;

impl PathBuilder for DefaultPathBuilder {
    fn collection_path_for(&self, entity_type: &str) -> String {
        format!("/{}", KeyFormat::CamelCase.format(&pluralize(entity_type)))
    }
}

/// Return the plural of an English `noun`.
fn pluralize(noun: &str) -> String {
    let lower = noun.to_lowercase();
    let ends_with_consonant_y = lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .map_or(false, |character| "aeiou".contains(character));

    if ends_with_consonant_y {
        format!("{}ies", &noun[..noun.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        format!("{}es", noun)
    } else {
        format!("{}s", noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurals() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("branch"), "branches");
    }

    #[test]
    fn roots_are_camel_cased_plurals() {
        let paths = DefaultPathBuilder;
        assert_eq!(paths.collection_path_for("blog-post"), "/blogPosts");
        assert_eq!(paths.root_path_for("comment", "c1"), "/comments/c1");
    }
}
