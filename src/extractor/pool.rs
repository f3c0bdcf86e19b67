//! Pool pages (`index.php?page=pool&s=show&id=<ID>`).
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_ids, request_url};
use crate::{
    config::ServerConfig, error::ExtractorError, http::PageFetcher, message::DirectoryMeta,
};

static POOL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?gelbooru\.com/(?:index\.php)?\?page=pool&s=show&id=(\d+)")
        .unwrap()
});

/// Pool thumbnails are wrapped in a `<span id="p<ID>">`.
const POOL_THUMB_BEGIN: &str = r#"id="p"#;

/// Lists every post of a pool. Gelbooru shows whole pools on a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolListing {
    pool_id: String,
    fetched: bool,
}

impl PoolListing {
    pub fn new(pool_id: &str) -> Self {
        Self {
            pool_id: pool_id.to_string(),
            fetched: false,
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let caps = POOL_PATTERN.captures(url)?;
        Some(Self::new(caps.get(1)?.as_str()))
    }

    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    pub fn metadata(&self) -> DirectoryMeta {
        let mut meta = DirectoryMeta::new("pool", &["{category}", "pool", "{pool}"]);
        meta.pool = Some(self.pool_id.clone());
        meta
    }

    pub async fn next_batch<F: PageFetcher>(
        &mut self,
        fetcher: &F,
        config: &ServerConfig,
    ) -> Result<Option<Vec<String>>, ExtractorError> {
        if self.fetched {
            return Ok(None);
        }

        let url = request_url(
            config,
            &[("page", "pool"), ("s", "show"), ("id", self.pool_id.as_str())],
        )?;

        let page = fetcher.get_page(url).await?;
        self.fetched = true;

        let ids = parse_ids(&page, POOL_THUMB_BEGIN);
        debug!("Pool {} holds {} posts", self.pool_id, ids.len());

        Ok(Some(ids))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{pool_listing, StaticPages};

    #[test]
    fn parse_pool_urls() {
        let pool = PoolListing::from_url("https://gelbooru.com/index.php?page=pool&s=show&id=761")
            .unwrap();
        assert_eq!(pool.pool_id(), "761");

        assert!(PoolListing::from_url("https://www.gelbooru.com/?page=pool&s=show&id=12").is_some());
        assert!(PoolListing::from_url("https://gelbooru.com/index.php?page=pool&s=show&id=abc").is_none());
    }

    #[test]
    fn pool_metadata() {
        let meta = PoolListing::new("761").metadata();

        assert_eq!(meta.subcategory, "pool");
        assert_eq!(meta.pool.as_deref(), Some("761"));
        assert!(meta.tags.is_none());
    }

    #[tokio::test]
    async fn single_listing_page() {
        let fetcher = StaticPages::new().with_page(
            "https://gelbooru.com/index.php?page=pool&s=show&id=761",
            pool_listing([10, 20, 30, 40, 50, 60]),
        );
        let config = ServerConfig::default();
        let mut pool = PoolListing::new("761");

        let ids = pool.next_batch(&fetcher, &config).await.unwrap().unwrap();

        // `id="paginator"` shares the thumbnail prefix and must not show up here
        assert_eq!(ids, ["10", "20", "30", "40", "50", "60"]);
        assert!(pool.next_batch(&fetcher, &config).await.unwrap().is_none());
        assert_eq!(fetcher.requests().len(), 1);
    }
}
