use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when fetching or parsing an RSS feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} while fetching feed from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur when deriving a downloadable episode from a feed item
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Episode '{title}' has no enclosure (media URL)")]
    MissingEnclosure { title: String },

    #[error("Episode '{title}' has an invalid media URL: {source}")]
    InvalidMediaUrl {
        title: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur while downloading an episode's media file
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors that can occur while writing ID3 metadata to a downloaded file
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to open ID3 tag in {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("Failed to save ID3 tag to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },
}

/// Top-level errors surfaced by the feed client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Episode error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed contains no episodes")]
    EmptyFeed,
}
