//! Run summary reporting
//!
//! Collects the counters of one mirror run and prints them once it ends.

use crate::download::DownloadOutcome;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Counters and timing of one mirror run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Pages fetched successfully by the crawl
    pub pages_crawled: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// Entry points that could not be fetched
    pub entry_points_failed: usize,

    /// Unique media URLs discovered
    pub media_found: usize,

    /// Media newly written to disk
    pub media_downloaded: usize,

    /// Media already present locally
    pub media_skipped: usize,

    /// Media outside the prefix or unmappable
    pub media_rejected: usize,

    /// Media whose download failed
    pub media_failed: usize,

    /// Where media files were written
    pub media_dir: PathBuf,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn new(media_dir: PathBuf) -> Self {
        Self {
            pages_crawled: 0,
            pages_failed: 0,
            entry_points_failed: 0,
            media_found: 0,
            media_downloaded: 0,
            media_skipped: 0,
            media_rejected: 0,
            media_failed: 0,
            media_dir,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Tallies one download outcome
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.media_downloaded += 1,
            DownloadOutcome::AlreadyPresent { .. } => self.media_skipped += 1,
            DownloadOutcome::Rejected => self.media_rejected += 1,
            DownloadOutcome::Failed => self.media_failed += 1,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("\n=== Mirror Summary ===\n");

    println!("Crawl:");
    println!("  Pages crawled: {}", summary.pages_crawled);
    if summary.pages_failed > 0 {
        println!("  Pages failed: {}", summary.pages_failed);
    }
    if summary.entry_points_failed > 0 {
        println!("  Entry points failed: {}", summary.entry_points_failed);
    }
    println!();

    println!("Media:");
    println!("  Unique media found: {}", summary.media_found);
    println!("  Downloaded: {}", summary.media_downloaded);
    println!("  Already present: {}", summary.media_skipped);
    if summary.media_rejected > 0 {
        println!("  Rejected: {}", summary.media_rejected);
    }
    println!("  Failed: {}", summary.media_failed);
    println!();

    println!("Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("Duration: {}s", seconds);
    }

    println!(
        "\nDone. Downloaded {} files into {}",
        summary.media_downloaded,
        summary.media_dir.display()
    );
}
