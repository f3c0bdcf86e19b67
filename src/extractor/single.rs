//! Single post pages (`index.php?page=post&s=view&id=<ID>`).
use once_cell::sync::Lazy;
use regex::Regex;

use crate::message::DirectoryMeta;

static POST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?gelbooru\.com/(?:index\.php)?\?page=post&s=view&id=(\d+)")
        .unwrap()
});

/// Yields the one post id taken from the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePost {
    post_id: String,
    emitted: bool,
}

impl SinglePost {
    pub fn new(post_id: &str) -> Self {
        Self {
            post_id: post_id.to_string(),
            emitted: false,
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let caps = POST_PATTERN.captures(url)?;
        Some(Self::new(caps.get(1)?.as_str()))
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn metadata(&self) -> DirectoryMeta {
        DirectoryMeta::new("post", &["{category}"])
    }

    pub fn next_batch(&mut self) -> Option<Vec<String>> {
        if self.emitted {
            return None;
        }

        self.emitted = true;
        Some(vec![self.post_id.clone()])
    }
}
