//! Main representation of a Gelbooru post
//!
//! # Post
//! A [`Post` struct](Post) holds everything scraped from a single post page. It's built right
//! before being sent to the consumer and isn't kept around after that.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::text::nameext_from_url;

use self::rating::Rating;

pub mod rating;

/// Catchall model for the scraped metadata of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// ID number of the post given by the imageboard
    pub id: u64,
    /// Space separated tag list, as shown in the page keywords
    pub tags: String,
    /// Upload date, as shown in the page
    pub created_at: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Link to the original source of the artwork, if the uploader set one
    pub source: Option<String>,
    pub rating: Rating,
    pub score: i64,
    /// Direct URL of the original image file located inside the imageboard's server
    pub file_url: String,
    /// Taken from the file name, Gelbooru names every file after its MD5 hash.
    pub md5: String,
    /// Decoded file name of `file_url`
    pub filename: String,
    /// `filename` without its extension
    pub name: String,
    /// Lowercase extension of `filename`
    pub extension: String,
}

impl Post {
    /// Fills `md5` and the file name fields from `file_url`.
    pub fn with_file_url(mut self, file_url: String) -> Self {
        let md5 = file_url
            .rsplit('/')
            .next()
            .and_then(|f| f.split('.').next())
            .unwrap_or_default()
            .to_string();

        let ne = nameext_from_url(&file_url);

        self.md5 = md5;
        self.filename = ne.filename;
        self.name = ne.name;
        self.extension = ne.extension;
        self.file_url = file_url;
        self
    }

    /// Returns the post fields as a JSON object, to be used as template keywords.
    pub fn kwdict(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_url_fields() {
        let post = Post::default().with_file_url(String::from(
            "https://img3.gelbooru.com/images/5e/25/5e2557131bb1e5ba3d3c6a4a4e9fc37a.jpeg",
        ));

        assert_eq!(post.md5, "5e2557131bb1e5ba3d3c6a4a4e9fc37a");
        assert_eq!(post.name, "5e2557131bb1e5ba3d3c6a4a4e9fc37a");
        assert_eq!(post.extension, "jpeg");
        assert_eq!(post.filename, "5e2557131bb1e5ba3d3c6a4a4e9fc37a.jpeg");
    }

    #[test]
    fn keywords_from_post() {
        let post = Post {
            id: 10,
            rating: Rating::Explicit,
            ..Default::default()
        };

        let kw = post.kwdict();

        assert_eq!(kw.get("id"), Some(&Value::from(10)));
        assert_eq!(kw.get("rating"), Some(&Value::from("explicit")));
        assert_eq!(kw.get("source"), Some(&Value::Null));
    }
}
