//! Extractors turning a Gelbooru URL into a stream of [`Message`]s.
//! # Extractors
//!
//! There are three kinds of jobs, all sharing the same post page scraper and differing only in how
//! they list post ids:
//! * [`TagSearch`]: walks the search listing 42 posts at a time until a page comes back short
//! * [`PoolListing`]: reads every post of a pool from its single listing page
//! * [`SinglePost`]: the one post named in the URL
//!
//! ## Example
//! ```no_run
//! use gelbooru_downloader::{config::ServerConfig, http::HttpFetcher, GelbooruExtractor};
//!
//! async fn test() {
//!     let config = ServerConfig::default();
//!     let fetcher = HttpFetcher::new(&config).unwrap();
//!
//!     let extractor = GelbooruExtractor::from_url(
//!         "https://gelbooru.com/index.php?page=pool&s=show&id=761",
//!         fetcher,
//!         config,
//!     )
//!     .unwrap();
//!
//!     for message in extractor.items().await.unwrap() {
//!         println!("{:?}", message);
//!     }
//! }
//! ```
use log::debug;
use reqwest::Url;
use tokio::{
    spawn,
    sync::mpsc::{unbounded_channel, Sender, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    config::ServerConfig,
    error::ExtractorError,
    http::PageFetcher,
    message::{DirectoryMeta, Message, MESSAGE_VERSION},
    post::Post,
    text::extract_iter,
};

pub use self::{pool::PoolListing, post_page::parse_post_page, single::SinglePost, tag::TagSearch};

mod pool;
mod post_page;
mod single;
mod tag;

pub type ExtractorThreadHandle = JoinHandle<Result<u64, ExtractorError>>;

/// Builds a request to the server's `index.php` with the given query.
pub(crate) fn request_url(
    config: &ServerConfig,
    query: &[(&str, &str)],
) -> Result<Url, ExtractorError> {
    let base = config.index_url();
    Url::parse_with_params(&base, query).map_err(|_| ExtractorError::InvalidUrl { url: base })
}

/// Collects the numeric ids found between `begin` and the next `"`.
pub(crate) fn parse_ids(page: &str, begin: &str) -> Vec<String> {
    extract_iter(page, begin, "\"")
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .map(ToString::to_string)
        .collect()
}

/// The way an extraction job enumerates its post ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSource {
    Tag(TagSearch),
    Pool(PoolListing),
    Post(SinglePost),
}

impl PostSource {
    /// Matches a URL against the tag search, pool and single post patterns, in that order.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();

        TagSearch::from_url(url)
            .map(Self::Tag)
            .or_else(|| PoolListing::from_url(url).map(Self::Pool))
            .or_else(|| SinglePost::from_url(url).map(Self::Post))
    }

    pub fn metadata(&self) -> DirectoryMeta {
        match self {
            Self::Tag(src) => src.metadata(),
            Self::Pool(src) => src.metadata(),
            Self::Post(src) => src.metadata(),
        }
    }

    /// Returns the next batch of post ids, or `None` when the source is exhausted.
    pub async fn next_batch<F: PageFetcher>(
        &mut self,
        fetcher: &F,
        config: &ServerConfig,
    ) -> Result<Option<Vec<String>>, ExtractorError> {
        match self {
            Self::Tag(src) => src.next_batch(fetcher, config).await,
            Self::Pool(src) => src.next_batch(fetcher, config).await,
            Self::Post(src) => Ok(src.next_batch()),
        }
    }
}

/// Runs one extraction job against Gelbooru.
///
/// Requests are made one after the other: a listing page, then every post page it lists, then
/// the next listing page.
#[derive(Debug)]
pub struct GelbooruExtractor<F: PageFetcher> {
    fetcher: F,
    config: ServerConfig,
    source: PostSource,
    limit: Option<u16>,
}

impl<F: PageFetcher + 'static> GelbooruExtractor<F> {
    pub const fn new(source: PostSource, fetcher: F, config: ServerConfig) -> Self {
        Self {
            fetcher,
            config,
            source,
            limit: None,
        }
    }

    /// Picks the job matching `url`.
    pub fn from_url(url: &str, fetcher: F, config: ServerConfig) -> Result<Self, ExtractorError> {
        let source = PostSource::from_url(url).ok_or_else(|| ExtractorError::UnsupportedUrl {
            url: url.to_string(),
        })?;

        debug!("Selected extractor: {:?}", source);
        Ok(Self::new(source, fetcher, config))
    }

    /// Stops the extraction after `limit` posts.
    pub fn set_limit(&mut self, limit: Option<u16>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub const fn source(&self) -> &PostSource {
        &self.source
    }

    /// Return the current configured server for this extractor
    pub fn config(&self) -> ServerConfig {
        self.config.clone()
    }

    /// General metadata of this job, sent as the directory record.
    pub fn metadata(&self) -> DirectoryMeta {
        self.source.metadata()
    }

    /// Fetches and scrapes a single post page.
    pub async fn get_post_data(&self, post_id: &str) -> Result<Post, ExtractorError> {
        let url = request_url(
            &self.config,
            &[("page", "post"), ("s", "view"), ("id", post_id)],
        )?;

        let page = self.fetcher.get_page(url).await?;
        parse_post_page(&page)
    }

    /// Sends every record of this job through `sender_channel`, in order.
    ///
    /// When `post_counter` is set, the number of posts found on each listing page is sent through
    /// it as soon as the page is read.
    ///
    /// Returns the number of URL records sent.
    pub async fn async_fetch(
        &mut self,
        sender_channel: UnboundedSender<Message>,
        post_counter: Option<Sender<u64>>,
    ) -> Result<u64, ExtractorError> {
        debug!("Async extractor thread initialized");

        sender_channel.send(Message::Version(MESSAGE_VERSION))?;
        sender_channel.send(Message::Directory(self.metadata()))?;

        let limit = self.limit.map(u64::from);
        let mut total_sent: u64 = 0;

        'pages: while let Some(ids) = self.source.next_batch(&self.fetcher, &self.config).await? {
            if let Some(counter) = &post_counter {
                let found = ids.len() as u64;
                let found = limit.map_or(found, |max| found.min(max.saturating_sub(total_sent)));
                counter.send(found).await?;
            }

            for post_id in ids {
                if limit.is_some_and(|max| total_sent >= max) {
                    break 'pages;
                }

                let post = self.get_post_data(&post_id).await?;
                debug!("Mapped post {}", post.id);

                sender_channel.send(Message::Url(post.file_url.clone(), post))?;
                total_sent += 1;
            }

            if limit.is_some_and(|max| total_sent >= max) {
                debug!("Target post count reached.");
                break;
            }
        }

        debug!("Terminating thread.");
        Ok(total_sent)
    }

    /// High-level convenience thread builder for [`async_fetch`](Self::async_fetch)
    pub fn setup_fetch_thread(
        self,
        sender_channel: UnboundedSender<Message>,
        post_counter: Option<Sender<u64>>,
    ) -> ExtractorThreadHandle {
        spawn(async move {
            let mut ext = self;
            ext.async_fetch(sender_channel, post_counter).await
        })
    }

    /// Runs the whole job and returns every record.
    pub async fn items(mut self) -> Result<Vec<Message>, ExtractorError> {
        let (tx, mut rx) = unbounded_channel();
        self.async_fetch(tx, None).await?;

        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }

        Ok(messages)
    }
}
