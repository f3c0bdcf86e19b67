//! Progress reporting hooks for the download queue.
//!
//! The library never draws anything by itself. Frontends implement [`ProgressListener`] and hand
//! it to the [`Queue`](crate::queue::Queue).
use std::fmt::Debug;
use std::sync::Arc;

/// Kind of event being reported, so frontends can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Info,
    /// File was skipped (already exists, remote error).
    Skip,
    /// Existing file was removed before downloading it again.
    Remove,
    Error,
}

/// Overall progress of a download job. All methods must be thread-safe.
pub trait ProgressListener: Send + Sync + Debug {
    /// Increments the number of expected files.
    ///
    /// Called whenever the extractor finds more posts.
    fn inc_main_total(&self, delta: u64);
    /// One file was handled, whatever the outcome.
    fn main_tick(&self);
    fn main_done(&self);

    /// Starts tracking the transfer of a single file.
    fn add_download_task(
        &self,
        name: String,
        total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater>;

    fn log_event(&self, log_type: LogType, target: &str, message: &str);
}

/// Progress of a single file transfer.
pub trait DownloadProgressUpdater: Send + Sync + Debug {
    fn set_progress(&self, bytes_downloaded: u64);
    /// Called once the transfer ends, successfully or not.
    fn finish(&self);
}

#[derive(Debug, Clone)]
pub struct NoOpProgressListener;

impl ProgressListener for NoOpProgressListener {
    fn inc_main_total(&self, _delta: u64) {}
    fn main_tick(&self) {}
    fn main_done(&self) {}
    fn add_download_task(
        &self,
        _name: String,
        _total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater> {
        Box::new(NoOpDownloadProgressUpdater)
    }
    fn log_event(&self, _log_type: LogType, _target: &str, _message: &str) {}
}

#[derive(Debug, Clone)]
pub struct NoOpDownloadProgressUpdater;

impl DownloadProgressUpdater for NoOpDownloadProgressUpdater {
    fn set_progress(&self, _bytes_downloaded: u64) {}
    fn finish(&self) {}
}

pub type SharedProgressListener = Arc<dyn ProgressListener>;

pub fn no_op_progress_listener() -> SharedProgressListener {
    Arc::new(NoOpProgressListener)
}
