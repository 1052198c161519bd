//! Crawler - the breadth-first traversal loop
//!
//! Pops URLs from the frontier one at a time, fetches them, extracts links and
//! media, and feeds newly seen links back into the frontier until the queue
//! runs dry or the page cap is reached. Fetches are strictly sequential and
//! spaced by the configured crawl delay.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::Frontier;
use crate::url::PathFilter;
use crate::MirrorError;
use reqwest::Client;
use std::collections::BTreeSet;
use tokio::time::{sleep, Instant};
use url::Url;

/// Single-origin breadth-first crawler
pub struct Crawler {
    client: Client,
    filter: PathFilter,
    config: CrawlerConfig,
    frontier: Frontier,
    failed_pages: usize,
    last_fetch: Option<Instant>,
}

impl Crawler {
    /// Creates a crawler sharing the run's HTTP client
    pub fn new(client: Client, filter: PathFilter, config: CrawlerConfig) -> Self {
        let frontier = Frontier::new(config.max_pages);
        Self {
            client,
            filter,
            config,
            frontier,
            failed_pages: 0,
            last_fetch: None,
        }
    }

    /// Crawls from `seed` and returns every media URL discovered
    ///
    /// Fetch failures are logged and skipped without retry; the failed URL
    /// stays visited. The run ends when the frontier is empty or
    /// `max-pages` pages have been fetched successfully.
    pub async fn crawl(&mut self, seed: Url) -> BTreeSet<Url> {
        self.frontier = Frontier::with_seed(seed, self.config.max_pages);
        self.failed_pages = 0;

        let mut found_media = BTreeSet::new();

        while let Some(url) = self.frontier.dequeue() {
            self.pace().await;

            let body = match fetch_page(&self.client, &url, self.config.request_timeout()).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}", url, e);
                    self.failed_pages += 1;
                    continue;
                }
            };

            let pages_crawled = self.frontier.record_page();
            tracing::info!("[{}] Crawled: {}", pages_crawled, url);

            let page = extract_page(&body, &url, &self.filter);
            if page.is_empty() {
                tracing::debug!("Nothing to follow or download on {}", url);
            } else {
                tracing::debug!(
                    "{} links, {} media on {}",
                    page.links.len(),
                    page.media.len(),
                    url
                );
            }
            found_media.extend(page.media);

            for link in page.links {
                if self.frontier.enqueue(link.clone()) {
                    tracing::trace!("Queued {}", link);
                }
            }
        }

        if self.frontier.cap_reached() && !self.frontier.is_empty() {
            tracing::info!(
                "Page cap of {} reached with {} URLs still queued",
                self.frontier.max_pages(),
                self.frontier.queued_len()
            );
        }

        tracing::info!(
            "Crawled pages: {} ({} URLs visited, {} failed)",
            self.frontier.pages_crawled(),
            self.frontier.visited_len(),
            self.failed_pages
        );
        tracing::info!("Media links found: {}", found_media.len());

        found_media
    }

    /// Fetches a single page and returns only its media, following no links
    ///
    /// Used for entry points that may not be reachable through the link graph.
    pub async fn scan_entry_point(&mut self, url: &Url) -> Result<BTreeSet<Url>, MirrorError> {
        self.pace().await;
        let body = fetch_page(&self.client, url, self.config.request_timeout()).await?;
        Ok(extract_page(&body, url, &self.filter).media)
    }

    /// Pages fetched successfully by the last crawl
    pub fn pages_crawled(&self) -> usize {
        self.frontier.pages_crawled()
    }

    /// Pages whose fetch failed during the last crawl
    pub fn failed_pages(&self) -> usize {
        self.failed_pages
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Waits until the crawl delay has elapsed since the previous fetch
    async fn pace(&mut self) {
        if let Some(last) = self.last_fetch {
            let delay = self.config.crawl_delay();
            let elapsed = last.elapsed();
            if elapsed < delay {
                sleep(delay - elapsed).await;
            }
        }
        self.last_fetch = Some(Instant::now());
    }
}
