use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use castfetch::{
    Client, ClientOptions, LatestSelection, NoopReporter, ProgressEvent, ProgressReporter,
    ReqwestClient, SharedProgressReporter,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[>] ");
static LABEL: Emoji<'_, '_> = Emoji("🏷️  ", "[t] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Download podcast episodes from an RSS feed and tag the latest one
#[derive(Parser, Debug)]
#[command(name = "castfetch")]
#[command(about = "Download and ID3-tag podcast episodes from RSS feeds")]
#[command(version)]
struct Args {
    /// RSS feed URL
    feed: String,

    /// Output directory for downloaded episodes
    output_dir: PathBuf,

    /// Only download the latest episode and write ID3 tags to it
    #[arg(short, long)]
    latest: bool,

    /// Select the latest episode by publication date instead of feed order
    #[arg(long, requires = "latest")]
    by_date: bool,

    /// Abort on the first failed download instead of continuing
    #[arg(long)]
    fail_fast: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output.
///
/// Downloads run one at a time, so a single download bar below the main
/// spinner is enough.
struct IndicatifReporter {
    multi: MultiProgress,
    download_bar: Mutex<Option<ProgressBar>>,
    main_bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            download_bar: Mutex::new(None),
            main_bar,
        }
    }

    fn start_download_bar(&self, content_length: Option<u64>, message: String) {
        let bar = match content_length {
            Some(length) => {
                let style = ProgressStyle::default_bar()
                    .template(&format!(
                        "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
                    ))
                    .unwrap()
                    .progress_chars("█▓░");

                let bar = self.multi.add(ProgressBar::new(length));
                bar.set_style(style);
                bar
            }
            // Unknown content length renders as an indeterminate spinner
            None => {
                let style = ProgressStyle::default_bar()
                    .template(&format!("  {DOWNLOAD}{{spinner:.cyan}} {{bytes}} {{wide_msg}}"))
                    .unwrap();

                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(style);
                bar.enable_steady_tick(std::time::Duration::from_millis(100));
                bar
            }
        };

        bar.set_message(message);
        *self.download_bar.lock().unwrap() = Some(bar);
    }

    fn finish_download_bar(&self) {
        if let Some(bar) = self.download_bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { url } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching feed: {}", url.cyan()));
            }

            ProgressEvent::FeedLoaded {
                feed_title,
                episode_count,
            } => {
                self.main_bar.set_message(format!(
                    "{HEADPHONES}{} • {} episodes",
                    feed_title.bold().green(),
                    episode_count.to_string().cyan()
                ));
            }

            ProgressEvent::EpisodeSkipped {
                episode_title,
                reason,
            } => {
                self.main_bar.println(format!(
                    "{SKIP}{} - {}",
                    truncate_title(&episode_title, 40).yellow(),
                    reason.dimmed()
                ));
            }

            ProgressEvent::DownloadStarting {
                episode_title,
                content_length,
            } => {
                self.start_download_bar(content_length, truncate_title(&episode_title, 40));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded, ..
            } => {
                if let Some(bar) = self.download_bar.lock().unwrap().as_ref() {
                    bar.set_position(bytes_downloaded);
                }
            }

            ProgressEvent::DownloadCompleted { episode_title, .. } => {
                self.finish_download_bar();
                self.main_bar.println(format!(
                    "{SUCCESS}{}",
                    truncate_title(&episode_title, 40).green()
                ));
            }

            ProgressEvent::DownloadFailed {
                episode_title,
                error,
            } => {
                self.finish_download_bar();
                self.main_bar.println(format!(
                    "{FAILURE}{} - {}",
                    truncate_title(&episode_title, 30).red(),
                    error.red()
                ));
            }

            ProgressEvent::TaggingEpisode { episode_title } => {
                self.main_bar.set_message(format!(
                    "{LABEL}Tagging {}",
                    truncate_title(&episode_title, 40).cyan()
                ));
            }

            ProgressEvent::BatchCompleted {
                downloaded_count,
                skipped_count,
                failed_count,
            } => {
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} downloaded, {} skipped, {} failed",
                    "Done:".bold().green(),
                    downloaded_count.to_string().green().bold(),
                    skipped_count.to_string().yellow(),
                    if failed_count > 0 {
                        failed_count.to_string().red().bold()
                    } else {
                        failed_count.to_string().green()
                    }
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "castfetch".bold().magenta(),
        "- Podcast Downloader".dimmed()
    );

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let options = ClientOptions {
        continue_on_error: !args.fail_fast,
        latest_selection: if args.by_date {
            LatestSelection::PubDate
        } else {
            LatestSelection::DocumentOrder
        },
    };

    let client = Client::load(ReqwestClient::new(), &args.feed, options, reporter)
        .await
        .context("Failed to load feed")?;

    if args.latest {
        let path = client
            .download_latest(&args.output_dir)
            .await
            .context("Failed to download latest episode")?;

        if !args.quiet {
            println!(
                "\n{SUCCESS}{} {}\n",
                "Tagged:".bold().green(),
                path.display().to_string().cyan()
            );
        }

        return Ok(());
    }

    let outcome = client
        .download_all(&args.output_dir)
        .await
        .context("Failed to download episodes")?;

    if !args.quiet && !outcome.failed.is_empty() {
        println!("\n{}", "Failed episodes:".red().bold());
        for (title, error) in &outcome.failed {
            println!("  {} - {}", title.yellow(), error.dimmed());
        }
    }

    if !args.quiet {
        println!(
            "\n{FOLDER}Output: {}\n",
            args.output_dir.display().to_string().cyan()
        );
    }

    if outcome.downloaded == 0 && !outcome.failed.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
