use futures::{future, StreamExt};
use log::debug;
use md5::compute;
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::{
    fs::{create_dir_all, read, remove_file, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc::UnboundedReceiver,
    task,
};
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{DownloadTarget, Queue, Resolver};
use crate::{
    error::{PostError, QueueError},
    message::Message,
    progress::{LogType, SharedProgressListener},
};

/// Outcome of a single download task.
#[derive(Debug)]
enum DownloadTaskStatus {
    Downloaded(DownloadTarget),
    /// An identical file was already there
    Skipped(DownloadTarget),
}

impl Queue {
    pub(crate) async fn download_channel(
        &self,
        channel_rx: UnboundedReceiver<Message>,
    ) -> Result<u64, QueueError> {
        self.create_out().await?;

        let downloaded = Arc::new(AtomicU64::new(0));
        let mut resolver = Resolver::new(&self.output, &self.filename_fmt);

        UnboundedReceiverStream::new(channel_rx)
            .filter_map(|message| future::ready(resolver.resolve(message)))
            .map(|target| {
                let client = self.client.clone();
                let listener = self.progress_listener.clone();

                task::spawn(async move {
                    if Self::check_file_exists(&target, &listener).await? {
                        return Ok(DownloadTaskStatus::Skipped(target));
                    }

                    Self::fetch(&client, &target, &listener).await?;
                    Ok::<_, PostError>(DownloadTaskStatus::Downloaded(target))
                })
            })
            .buffer_unordered(usize::from(self.sim_downloads))
            .for_each(|result| {
                self.progress_listener.main_tick();

                match result {
                    Ok(Ok(DownloadTaskStatus::Downloaded(target))) => {
                        debug!("Post {} saved to {}", target.post_id, target.path.display());
                        downloaded.fetch_add(1, Ordering::SeqCst);
                    }
                    Ok(Ok(DownloadTaskStatus::Skipped(target))) => {
                        debug!("Post {} was skipped.", target.post_id);
                    }
                    Ok(Err(error)) => {
                        debug!("Failed to process post: {}", error);
                        self.progress_listener
                            .log_event(LogType::Error, "download", &error.to_string());
                    }
                    Err(join_error) => {
                        debug!("Download task failed to execute: {}", join_error);
                    }
                }

                future::ready(())
            })
            .await;

        self.progress_listener.main_done();

        Ok(downloaded.load(Ordering::SeqCst))
    }

    /// Checks whether the target file is already there.
    ///
    /// * `Ok(true)`: a file with the expected MD5 exists, skip the download.
    /// * `Ok(false)`: nothing there, or a mismatching file that was removed. Download it.
    async fn check_file_exists(
        target: &DownloadTarget,
        progress_listener: &SharedProgressListener,
    ) -> Result<bool, PostError> {
        if !target.path.exists() {
            return Ok(false);
        }

        let file_content = read(&target.path).await?;
        let hash = format!("{:x}", compute(file_content));

        if hash.eq_ignore_ascii_case(&target.md5) {
            progress_listener.log_event(
                LogType::Skip,
                &target.file_name(),
                "already exists and is identical (MD5 match)",
            );
            return Ok(true);
        }

        remove_file(&target.path).await?;
        progress_listener.log_event(
            LogType::Remove,
            &target.file_name(),
            "MD5 mismatch, downloading again",
        );
        Ok(false)
    }

    async fn fetch(
        client: &Client,
        target: &DownloadTarget,
        progress_listener: &SharedProgressListener,
    ) -> Result<(), PostError> {
        let fname = target.file_name();
        debug!("Fetching {} for post ID {} into file {}", target.url, target.post_id, fname);

        let res = client.get(&target.url).send().await?;

        if res.status().is_client_error() {
            progress_listener.log_event(
                LogType::Skip,
                &fname,
                &format!("server returned: {}", res.status()),
            );
            return Err(PostError::RemoteFileNotFound);
        }

        let res = res.error_for_status()?;

        if let Some(parent) = target.path.parent() {
            create_dir_all(parent).await?;
        }

        let dl_updater = progress_listener.add_download_task(fname, res.content_length());
        let result = Self::write_stream(res, &target.path, |bytes| dl_updater.set_progress(bytes)).await;
        dl_updater.finish();

        if result.is_err() && target.path.exists() {
            remove_file(&target.path).await?;
        }

        result
    }

    async fn write_stream(
        res: reqwest::Response,
        path: &Path,
        on_progress: impl Fn(u64),
    ) -> Result<(), PostError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;

        let mut bw = BufWriter::new(file);
        let mut stream = res.bytes_stream();
        let mut downloaded_bytes = 0;

        while let Some(item) = stream.next().await {
            let mut chunk = item.map_err(|e| PostError::ChunkDownloadFail {
                message: e.to_string(),
            })?;

            downloaded_bytes += chunk.len() as u64;
            bw.write_all_buf(&mut chunk).await?;
            on_progress(downloaded_bytes);
        }

        bw.flush().await?;
        Ok(())
    }
}
