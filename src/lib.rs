//! # Gelbooru Downloader
//!
//! gelbooru_downloader scrapes tag searches, pools and single posts from Gelbooru and turns them
//! into a stream of download records.
//!
//! The scraping side ([`GelbooruExtractor`]) only reads HTML pages and sends [`Message`]s through
//! a channel. The downloading side ([`Queue`]) consumes them and saves every file to a directory
//! rendered from the job metadata.
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod http;
pub mod message;
pub mod post;
pub mod progress;
pub mod progress_bars;
pub mod queue;
pub mod text;


// Export the extractor entry point
pub use extractor::GelbooruExtractor;

// Export main worker queue
pub use queue::Queue;

pub use message::Message;

pub use post::{rating::Rating, Post};
