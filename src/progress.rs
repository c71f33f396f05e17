use std::sync::Arc;

/// Events emitted while loading a feed and downloading episodes
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Feed is being fetched from URL
    FetchingFeed { url: String },

    /// Feed has been fetched and parsed successfully
    FeedLoaded {
        feed_title: String,
        episode_count: usize,
    },

    /// An episode was skipped (e.g. no media enclosure)
    EpisodeSkipped { episode_title: String, reason: String },

    /// A download is starting
    DownloadStarting {
        episode_title: String,
        /// Expected content length in bytes, if the server declared one
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        episode_title: String,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A download completed successfully
    DownloadCompleted {
        episode_title: String,
        bytes_downloaded: u64,
    },

    /// A download failed
    DownloadFailed {
        episode_title: String,
        error: String,
    },

    /// ID3 metadata is being written to a downloaded file
    TaggingEpisode { episode_title: String },

    /// A batch download finished
    BatchCompleted {
        downloaded_count: usize,
        skipped_count: usize,
        failed_count: usize,
    },
}

/// Trait for reporting progress events during feed processing.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
