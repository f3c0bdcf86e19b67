//! Server and output settings.
//!
//! Defaults point to `https://gelbooru.com`. Every field can be overridden through a TOML file,
//! see [`serialize`] for how it's located and read.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, time::Duration};

pub mod serialize;

pub(crate) const DEFAULT_UA: &str =
    concat!("Rust Gelbooru Downloader/", env!("CARGO_PKG_VERSION"));

/// Number of posts Gelbooru shows on a listing page.
pub const GELBOORU_PAGE_SIZE: usize = 42;

pub const DEFAULT_FILENAME_FMT: &str = "{category}_{id}_{md5}.{extension}";

pub static DEFAULT_SERVER: Lazy<ServerConfig> = Lazy::new(|| ServerConfig {
    name: String::from("gelbooru"),
    pretty_name: String::from("Gelbooru"),
    base_url: String::from("https://gelbooru.com"),
    user_agent: String::from(DEFAULT_UA),
    page_size: GELBOORU_PAGE_SIZE,
    request_delay_ms: 0,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub pretty_name: String,
    /// Scheme and host every request is sent to. Must not end with `/`.
    pub base_url: String,
    pub user_agent: String,
    /// Listing pages holding fewer ids than this are considered the last one.
    pub page_size: usize,
    /// Time to wait before fetching each listing page after the first.
    pub request_delay_ms: u64,
}

impl ServerConfig {
    /// Builds the `index.php` endpoint of the configured server.
    #[inline]
    pub fn index_url(&self) -> String {
        format!("{}/index.php", self.base_url.trim_end_matches('/'))
    }

    #[inline]
    pub const fn request_delay(&self) -> Option<Duration> {
        if self.request_delay_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.request_delay_ms))
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        DEFAULT_SERVER.clone()
    }
}

impl Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Template used to name each downloaded file
    pub filename_fmt: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_fmt: String::from(DEFAULT_FILENAME_FMT),
        }
    }
}

/// Full configuration, as read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub output: OutputConfig,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_endpoints() {
        let cfg = ServerConfig::default();

        assert_eq!(cfg.index_url(), "https://gelbooru.com/index.php");
        assert_eq!(cfg.page_size, 42);
        assert!(cfg.request_delay().is_none());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let cfg = ServerConfig {
            base_url: String::from("http://127.0.0.1:8080/"),
            request_delay_ms: 500,
            ..Default::default()
        };

        assert_eq!(cfg.index_url(), "http://127.0.0.1:8080/index.php");
        assert_eq!(cfg.request_delay(), Some(Duration::from_millis(500)));
    }
}
