use std::io;

use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

use crate::message::Message;

/// Enumerates the possible errors that can arise during extractor operations.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The URL doesn't point to a tag search, a pool or a post.
    #[error("No extractor found for {url}")]
    UnsupportedUrl { url: String },

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid request URL: {url}")]
    InvalidUrl { url: String },

    /// An error occurred during a network request, including non-success HTTP statuses.
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    /// The page source didn't serve what was asked for.
    #[error("Imageboard returned an invalid response")]
    InvalidServerResponse,

    /// A post page is missing a field required to build its record.
    #[error("Post is missing an essential field {field}")]
    MissingField { field: String },

    /// Failed to hand a record to the consumer.
    #[error("Failed to send message through channel")]
    ChannelSendFail(#[from] SendError<Message>),

    /// Failed to send length data to a progress counter.
    #[error("Error sending length data to progress counter: {source}")]
    SendLengthFail {
        #[from]
        source: SendError<u64>,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to parse config file: {source}")]
    ParseError {
        #[from]
        source: toml::de::Error,
    },

    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Failed to access file: {source}")]
    FileIOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to connect to download URL: {source}")]
    ConnectionFail {
        #[from]
        source: reqwest::Error,
    },

    #[error("Post URL is valid but original file doesn't exist")]
    RemoteFileNotFound,

    #[error("Error while fetching chunk: {message}")]
    ChunkDownloadFail { message: String },
}

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to create destination directory. error: {message}")]
    DirCreationError { message: String },
}
