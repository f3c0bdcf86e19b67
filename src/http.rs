//! Page fetching capability used by the extractors.
use log::debug;
use reqwest::{Client, Url};
use std::future::Future;

use crate::{config::ServerConfig, error::ExtractorError};

/// Anything able to return the HTML of a page.
///
/// The extractors only ever need the body as text, so this is the seam where the real HTTP client
/// can be swapped for canned pages.
pub trait PageFetcher: Send + Sync {
    fn get_page(&self, url: Url) -> impl Future<Output = Result<String, ExtractorError>> + Send;
}

/// [`PageFetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Sets up a client using the user agent from the server config.
    pub fn new(config: &ServerConfig) -> Result<Self, ExtractorError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        debug!("Using user-agent: {}", config.user_agent);

        Ok(Self { client })
    }

    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the used client for external use.
    pub fn client(&self) -> Client {
        self.client.clone()
    }
}

impl PageFetcher for HttpFetcher {
    async fn get_page(&self, url: Url) -> Result<String, ExtractorError> {
        debug!("Fetching page {url}");

        let page = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(page)
    }
}
