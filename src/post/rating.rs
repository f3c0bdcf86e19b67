//! General enum for rating posts found by the extractor
//! # Post Rating
//! Gelbooru classifies posts considering how explicit they are. The post page shows it as
//! `Rating: Safe`, `Rating: Questionable` or `Rating: Explicit`, while newer pages may also use
//! `General` and `Sensitive`.
//!
//! `General` is read as [`Rating::Safe`] and `Sensitive` as [`Rating::Questionable`].

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Represents posts that are don't involve anything suggestive or sensitive.
    Safe,
    /// Represents posts that have some degree of nudity or sexually suggestive elements.
    Questionable,
    /// Represents posts that have explicit elements of pornography, gore, death, etc.
    Explicit,
    /// Represents a failure to parse the `rating` field into one of the above.
    #[default]
    Unknown,
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Questionable => write!(f, "questionable"),
            Self::Explicit => write!(f, "explicit"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl Rating {
    /// Guess the variant according to the rating text present in the post page
    pub fn from_rating_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "s" | "g" | "safe" | "general" => Self::Safe,
            "q" | "questionable" | "sensitive" => Self::Questionable,
            "e" | "explicit" => Self::Explicit,
            _ => Self::Unknown,
        }
    }
}
