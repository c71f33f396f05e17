pub mod client;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;
pub mod tag;

// Re-export main types for convenience
pub use client::{BatchOutcome, Client, ClientOptions, DownloadTask, LatestSelection};
pub use episode::{Episode, download_media, episode_filename, extract_episode, sanitize_title};
pub use error::{ClientError, DownloadError, ExtractError, FeedError, TagError};
pub use feed::{Feed, Item, fetch_feed, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use tag::write_tags;
