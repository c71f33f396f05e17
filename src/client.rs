// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use crate::episode::{Episode, download_media, episode_filename, extract_episode};
use crate::error::ClientError;
use crate::feed::{Feed, fetch_feed};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::tag::write_tags;

/// How "latest episode" is selected from the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatestSelection {
    /// First item in document order. Most podcast feeds list newest first,
    /// but nothing in RSS guarantees it.
    #[default]
    DocumentOrder,
    /// Newest item by parsed publication date; items without a date are
    /// ignored unless no item carries one, in which case the first item
    /// in document order is used.
    PubDate,
}

/// Options controlling client behavior
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Keep going after a failed episode download instead of returning
    /// the first hard error
    pub continue_on_error: bool,
    /// Selection strategy for download_latest
    pub latest_selection: LatestSelection,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            latest_selection: LatestSelection::default(),
        }
    }
}

/// Result of a bulk download
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Number of episodes successfully downloaded
    pub downloaded: usize,
    /// Number of episodes skipped (no media enclosure)
    pub skipped: usize,
    /// Details of failed episodes (title, error message)
    pub failed: Vec<(String, String)>,
}

/// A feed client bound to one podcast feed.
///
/// Construction fetches and parses the feed; there is no partially
/// constructed state. The feed is immutable afterwards and only replaced
/// wholesale by `reload`.
pub struct Client<C: HttpClient> {
    http: C,
    feed_url: String,
    feed: Feed,
    options: ClientOptions,
    reporter: SharedProgressReporter,
}

impl<C: HttpClient> Client<C> {
    /// Fetch and parse the feed, returning a ready-to-use client
    pub async fn load(
        http: C,
        feed_url: &str,
        options: ClientOptions,
        reporter: SharedProgressReporter,
    ) -> Result<Self, ClientError> {
        reporter.report(ProgressEvent::FetchingFeed {
            url: feed_url.to_string(),
        });

        let feed = fetch_feed(&http, feed_url).await?;

        reporter.report(ProgressEvent::FeedLoaded {
            feed_title: feed.title.clone(),
            episode_count: feed.items.len(),
        });

        Ok(Self {
            http,
            feed_url: feed_url.to_string(),
            feed,
            options,
            reporter,
        })
    }

    /// The parsed feed this client operates on
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Re-fetch the feed and replace the in-memory copy
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.reporter.report(ProgressEvent::FetchingFeed {
            url: self.feed_url.clone(),
        });

        let feed = fetch_feed(&self.http, &self.feed_url).await?;

        self.reporter.report(ProgressEvent::FeedLoaded {
            feed_title: feed.title.clone(),
            episode_count: feed.items.len(),
        });

        self.feed = feed;
        Ok(())
    }

    /// Download every episode in document order to `output_dir`.
    ///
    /// Items without a media enclosure are skipped with a diagnostic and
    /// processing continues. Hard download errors are either aggregated
    /// into the outcome or, with `continue_on_error` disabled, returned
    /// immediately as the first error encountered.
    pub async fn download_all(&self, output_dir: &Path) -> Result<BatchOutcome, ClientError> {
        ensure_output_dir(output_dir)?;

        let mut outcome = BatchOutcome::default();

        for item in &self.feed.items {
            let episode = match extract_episode(item) {
                Ok(episode) => episode,
                Err(e) => {
                    self.reporter.report(ProgressEvent::EpisodeSkipped {
                        episode_title: item.title.clone(),
                        reason: e.to_string(),
                    });
                    outcome.skipped += 1;
                    continue;
                }
            };

            let task = DownloadTask::new(output_dir, episode);

            match download_media(&self.http, &task.episode, &task.output_path, &self.reporter).await
            {
                Ok(_) => outcome.downloaded += 1,
                Err(e) => {
                    self.reporter.report(ProgressEvent::DownloadFailed {
                        episode_title: task.episode.title.clone(),
                        error: e.to_string(),
                    });

                    if !self.options.continue_on_error {
                        return Err(e.into());
                    }
                    outcome
                        .failed
                        .push((task.episode.title.clone(), e.to_string()));
                }
            }
        }

        self.reporter.report(ProgressEvent::BatchCompleted {
            downloaded_count: outcome.downloaded,
            skipped_count: outcome.skipped,
            failed_count: outcome.failed.len(),
        });

        Ok(outcome)
    }

    /// Download the latest episode and write its ID3 metadata.
    ///
    /// "Latest" is chosen per `ClientOptions::latest_selection`. The file
    /// is tagged with the channel author as artist, the episode title, and
    /// the episode summary as a comment frame. Returns the path of the
    /// tagged file.
    pub async fn download_latest(&self, output_dir: &Path) -> Result<PathBuf, ClientError> {
        ensure_output_dir(output_dir)?;

        let item = self.select_latest().ok_or(ClientError::EmptyFeed)?;
        let task = DownloadTask::new(output_dir, extract_episode(item)?);

        download_media(&self.http, &task.episode, &task.output_path, &self.reporter).await?;

        self.reporter.report(ProgressEvent::TaggingEpisode {
            episode_title: task.episode.title.clone(),
        });

        write_tags(
            &task.output_path,
            self.feed.author.as_deref(),
            &task.episode.title,
            task.episode.summary.as_deref(),
        )?;

        Ok(task.output_path)
    }

    fn select_latest(&self) -> Option<&crate::feed::Item> {
        match self.options.latest_selection {
            LatestSelection::DocumentOrder => self.feed.items.first(),
            LatestSelection::PubDate => self
                .feed
                .items
                .iter()
                .filter(|item| item.pub_date.is_some())
                .max_by_key(|item| item.pub_date)
                .or_else(|| self.feed.items.first()),
        }
    }
}

fn ensure_output_dir(output_dir: &Path) -> Result<(), ClientError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ClientError::OutputDirFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })
}

/// One episode paired with its destination path; built per download and
/// consumed immediately
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub episode: Episode,
    pub output_path: PathBuf,
}

impl DownloadTask {
    /// Pair an episode with its `<output_dir>/<sanitized title>.mp3` path
    pub fn new(output_dir: &Path, episode: Episode) -> Self {
        let output_path = output_dir.join(episode_filename(&episode.title));
        Self {
            episode,
            output_path,
        }
    }
}
