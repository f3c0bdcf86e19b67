//! Tag search listings (`index.php?page=post&s=list&tags=<TAGS>`).
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use tokio::time::sleep;

use super::{parse_ids, request_url};
use crate::{
    config::ServerConfig, error::ExtractorError, http::PageFetcher, message::DirectoryMeta,
    text::unquote,
};

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?gelbooru\.com/(?:index\.php)?\?page=post&s=list&tags=([^&]+)",
    )
    .unwrap()
});

/// Every thumbnail on a search page is an anchor with the post id prefixed by `p`.
const THUMB_BEGIN: &str = r#"<a id="p"#;

/// Pages through a tag search, one listing page per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSearch {
    tags: String,
    offset: usize,
    exhausted: bool,
}

impl TagSearch {
    pub fn new(tags: &str) -> Self {
        Self {
            tags: tags.to_string(),
            offset: 0,
            exhausted: false,
        }
    }

    /// Reads the searched tags from a search URL.
    ///
    /// The URL holds them `+` separated and percent-encoded.
    pub fn from_url(url: &str) -> Option<Self> {
        let caps = TAG_PATTERN.captures(url)?;
        let raw = caps.get(1)?.as_str().replace('+', " ");

        Some(Self::new(&unquote(&raw)))
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn metadata(&self) -> DirectoryMeta {
        let mut meta = DirectoryMeta::new("tag", &["{category}", "{tags}"]);
        meta.tags = Some(self.tags.clone());
        meta
    }

    fn page_url(&self, config: &ServerConfig) -> Result<Url, ExtractorError> {
        let offset = self.offset.to_string();

        request_url(
            config,
            &[
                ("page", "post"),
                ("s", "list"),
                ("tags", self.tags.as_str()),
                ("pid", offset.as_str()),
            ],
        )
    }

    /// Fetches the next listing page.
    ///
    /// Returns `None` once a page holding fewer ids than the configured page size was seen.
    pub async fn next_batch<F: PageFetcher>(
        &mut self,
        fetcher: &F,
        config: &ServerConfig,
    ) -> Result<Option<Vec<String>>, ExtractorError> {
        if self.exhausted {
            return Ok(None);
        }

        if self.offset > 0 {
            if let Some(delay) = config.request_delay() {
                debug!("Debouncing listing requests by {:?}", delay);
                sleep(delay).await;
            }
        }

        let page = fetcher.get_page(self.page_url(config)?).await?;
        let ids = parse_ids(&page, THUMB_BEGIN);

        let page_size = config.page_size.max(1);
        debug!(
            "Found {} posts at offset {} for tags '{}'",
            ids.len(),
            self.offset,
            self.tags
        );

        if ids.len() < page_size {
            self.exhausted = true;
        } else {
            self.offset += page_size;
        }

        Ok(Some(ids))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{tag_listing, StaticPages};
    use std::time::Duration;
    use tokio::time::Instant;

    const LIST_URL: &str = "https://gelbooru.com/index.php?page=post&s=list";

    #[test]
    fn parse_search_urls() {
        let search =
            TagSearch::from_url("https://gelbooru.com/index.php?page=post&s=list&tags=bonocho")
                .unwrap();
        assert_eq!(search.tags(), "bonocho");

        let search =
            TagSearch::from_url("gelbooru.com/?page=post&s=list&tags=touhou+hakurei_reimu%21&pid=42")
                .unwrap();
        assert_eq!(search.tags(), "touhou hakurei_reimu!");

        assert!(TagSearch::from_url("https://gelbooru.com/index.php?page=pool&s=show&id=761").is_none());
        assert!(TagSearch::from_url("https://danbooru.donmai.us/?page=post&s=list&tags=a").is_none());
    }

    #[test]
    fn search_metadata() {
        let meta = TagSearch::new("fate/stay_night saber").metadata();

        assert_eq!(meta.subcategory, "tag");
        assert_eq!(meta.tags.as_deref(), Some("fate/stay_night saber"));
        assert_eq!(meta.directory_fmt, ["{category}", "{tags}"]);
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let fetcher = StaticPages::new()
            .with_page(
                &format!("{LIST_URL}&tags=long+search&pid=0"),
                tag_listing(1..=42),
            )
            .with_page(
                &format!("{LIST_URL}&tags=long+search&pid=42"),
                tag_listing(43..=84),
            )
            .with_page(
                &format!("{LIST_URL}&tags=long+search&pid=84"),
                tag_listing(85..=90),
            );
        let config = ServerConfig::default();
        let mut search = TagSearch::new("long search");

        let mut sizes = Vec::new();
        while let Some(ids) = search.next_batch(&fetcher, &config).await.unwrap() {
            sizes.push(ids.len());
        }

        assert_eq!(sizes, [42, 42, 6]);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn exact_multiple_needs_extra_page() {
        let fetcher = StaticPages::new()
            .with_page(&format!("{LIST_URL}&tags=a&pid=0"), tag_listing(1..=42))
            .with_page(&format!("{LIST_URL}&tags=a&pid=42"), tag_listing(std::iter::empty()));
        let config = ServerConfig::default();
        let mut search = TagSearch::new("a");

        let first = search.next_batch(&fetcher, &config).await.unwrap().unwrap();
        assert_eq!(first.first().map(String::as_str), Some("1"));

        let second = search.next_batch(&fetcher, &config).await.unwrap().unwrap();
        assert!(second.is_empty());

        assert!(search.next_batch(&fetcher, &config).await.unwrap().is_none());
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn only_numeric_ids_count_towards_page_size() {
        let page = format!(
            "{}<a id=\"pager-next\" href=\"?pid=3\">&gt;</a>",
            tag_listing([10, 11])
        );
        let fetcher = StaticPages::new().with_page(&format!("{LIST_URL}&tags=mixed&pid=0"), page);
        let config = ServerConfig {
            page_size: 3,
            ..Default::default()
        };
        let mut search = TagSearch::new("mixed");

        // Three `<a id="p` anchors, but only two posts: the listing ends here
        let ids = search.next_batch(&fetcher, &config).await.unwrap().unwrap();
        assert_eq!(ids, ["10", "11"]);

        assert!(search.next_batch(&fetcher, &config).await.unwrap().is_none());
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_between_listing_pages() {
        let fetcher = StaticPages::new()
            .with_page(&format!("{LIST_URL}&tags=slow&pid=0"), tag_listing(1..=42))
            .with_page(&format!("{LIST_URL}&tags=slow&pid=42"), tag_listing(43..=44));
        let config = ServerConfig {
            request_delay_ms: 1000,
            ..Default::default()
        };
        let mut search = TagSearch::new("slow");

        let start = Instant::now();
        search.next_batch(&fetcher, &config).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        search.next_batch(&fetcher, &config).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(1));

        assert!(search.next_batch(&fetcher, &config).await.unwrap().is_none());
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn network_errors_propagate() {
        let fetcher = StaticPages::new();
        let mut search = TagSearch::new("nothing");

        let res = search.next_batch(&fetcher, &ServerConfig::default()).await;
        assert!(matches!(res, Err(ExtractorError::InvalidServerResponse)));
    }
}
