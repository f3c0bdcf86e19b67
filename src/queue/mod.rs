//! Asynchronous download queue.
//!
//! The [`Queue`] consumes the records sent by an extractor:
//! * [`Message::Version`] is checked against [`MESSAGE_VERSION`]
//! * [`Message::Directory`] sets the directory every following file is saved to
//! * [`Message::Url`] is downloaded, with up to `sim_downloads` transfers running at once
use log::{debug, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::spawn;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::{
    config::OutputConfig,
    error::QueueError,
    format::{render_directory, render_filename},
    message::{DirectoryMeta, Message, MESSAGE_VERSION},
    progress::{no_op_progress_listener, SharedProgressListener},
};

mod folder;

/// A file to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub post_id: u64,
    pub url: String,
    /// Expected MD5 of the file, used to skip files that were already downloaded.
    pub md5: String,
    pub path: PathBuf,
}

impl DownloadTarget {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |f| f.to_string_lossy().into_owned())
    }
}

/// Turns the record stream into download targets.
#[derive(Debug)]
struct Resolver<'a> {
    output: &'a Path,
    filename_fmt: &'a str,
    directory: Option<(PathBuf, DirectoryMeta)>,
}

impl<'a> Resolver<'a> {
    const fn new(output: &'a Path, filename_fmt: &'a str) -> Self {
        Self {
            output,
            filename_fmt,
            directory: None,
        }
    }

    fn resolve(&mut self, message: Message) -> Option<DownloadTarget> {
        match message {
            Message::Version(version) => {
                if version != MESSAGE_VERSION {
                    warn!(
                        "Extractor sent record version {}, expected {}",
                        version, MESSAGE_VERSION
                    );
                }
                None
            }
            Message::Directory(meta) => {
                let dir = self
                    .output
                    .join(render_directory(&meta.directory_fmt, &meta.kwdict()));
                debug!("Target dir: {}", dir.display());
                self.directory = Some((dir, meta));
                None
            }
            Message::Url(url, post) => {
                let (dir, kwdict) = match &self.directory {
                    Some((dir, meta)) => (dir.clone(), meta.post_kwdict(&post)),
                    None => {
                        warn!("No directory record received, saving to the output root");
                        (self.output.to_path_buf(), post.kwdict())
                    }
                };

                Some(DownloadTarget {
                    post_id: post.id,
                    url,
                    md5: post.md5,
                    path: dir.join(render_filename(self.filename_fmt, &kwdict)),
                })
            }
        }
    }
}

/// Manages the asynchronous download of posts.
#[derive(Debug)]
pub struct Queue {
    /// The number of concurrent downloads allowed.
    sim_downloads: u8,
    client: Client,
    /// Root dir, the directory records are resolved relative to it.
    output: PathBuf,
    filename_fmt: String,
    progress_listener: SharedProgressListener,
}

impl Queue {
    /// Set up the queue for download
    pub fn new(
        client: Client,
        sim_downloads: u8,
        output: PathBuf,
        options: &OutputConfig,
        progress_listener: Option<SharedProgressListener>,
    ) -> Self {
        Self {
            sim_downloads: sim_downloads.max(1),
            client,
            output,
            filename_fmt: options.filename_fmt.clone(),
            progress_listener: progress_listener.unwrap_or_else(no_op_progress_listener),
        }
    }

    /// Spawns the download task. It ends once the sender side of `channel_rx` is dropped and
    /// returns the number of files downloaded.
    pub fn setup_async_downloader(
        self,
        channel_rx: UnboundedReceiver<Message>,
    ) -> JoinHandle<Result<u64, QueueError>> {
        spawn(async move {
            debug!("Async Downloader thread initialized");
            self.download_channel(channel_rx).await
        })
    }

    /// Creates the output root.
    async fn create_out(&self) -> Result<(), QueueError> {
        tokio::fs::create_dir_all(&self.output)
            .await
            .map_err(|error| QueueError::DirCreationError {
                message: error.to_string(),
            })
    }
}
