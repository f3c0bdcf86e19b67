//! Records produced by an extractor.
//!
//! Every extraction emits, in this order:
//! 1. [`Message::Version`] with [`MESSAGE_VERSION`]
//! 2. A single [`Message::Directory`] describing where the files should be saved
//! 3. One [`Message::Url`] for each post found
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::post::Post;

/// Version of the record layout emitted by the extractors.
pub const MESSAGE_VERSION: u8 = 1;

/// Site name used as `{category}` in templates.
pub const CATEGORY: &str = "gelbooru";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Message {
    Version(u8),
    Directory(DirectoryMeta),
    Url(String, Post),
}

/// General metadata of an extraction job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMeta {
    pub category: String,
    /// Which kind of job produced the records: `tag`, `pool` or `post`
    pub subcategory: String,
    /// Path segment templates for the output directory
    pub directory_fmt: Vec<String>,
    /// Searched tags, only present on tag searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Pool ID, only present on pool downloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
}

impl DirectoryMeta {
    pub fn new(subcategory: &str, directory_fmt: &[&str]) -> Self {
        Self {
            category: CATEGORY.to_string(),
            subcategory: subcategory.to_string(),
            directory_fmt: directory_fmt.iter().map(ToString::to_string).collect(),
            tags: None,
            pool: None,
        }
    }

    /// Template keywords for the directory.
    pub fn kwdict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("category".into(), Value::from(self.category.as_str()));
        map.insert("subcategory".into(), Value::from(self.subcategory.as_str()));

        if let Some(tags) = &self.tags {
            map.insert("tags".into(), Value::from(tags.as_str()));
        }

        if let Some(pool) = &self.pool {
            map.insert("pool".into(), Value::from(pool.as_str()));
        }

        map
    }

    /// Template keywords for a file: the directory keywords overlaid with the post fields.
    pub fn post_kwdict(&self, post: &Post) -> Map<String, Value> {
        let mut map = self.kwdict();
        map.extend(post.kwdict());
        map
    }
}
