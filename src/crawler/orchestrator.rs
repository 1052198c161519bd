//! Orchestrator - one complete mirror run
//!
//! 1. Crawl the origin from its root page
//! 2. Scan each configured entry point for media without following links
//! 3. Download every discovered media URL in sorted order
//! 4. Report pages crawled, media found and media downloaded

use crate::config::{load_config_with_hash, Config};
use crate::crawler::coordinator::Crawler;
use crate::crawler::fetcher::build_http_client;
use crate::download::Downloader;
use crate::output::RunSummary;
use crate::url::{normalize, origin_root, PathFilter};
use crate::MirrorError;
use std::collections::BTreeSet;
use std::path::Path;
use url::Url;

/// Owns the crawler and downloader for a run
pub struct Orchestrator {
    config: Config,
    origin: Url,
    crawler: Crawler,
    downloader: Downloader,
}

impl Orchestrator {
    /// Builds the shared HTTP client and the components that use it
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(MirrorError)` - The origin is not a URL or the client could not be built
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let origin = Url::parse(&config.site.origin)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let filter = PathFilter::from_config(&config.site)?;

        let crawler = Crawler::new(client.clone(), filter, config.crawler.clone());
        let downloader = Downloader::new(
            client,
            config.output.mirror_root.clone(),
            config.site.media_prefix.clone(),
        )
        .with_read_timeout(config.crawler.request_timeout());

        Ok(Self {
            config,
            origin,
            crawler,
            downloader,
        })
    }

    /// Loads, validates and fingerprints a configuration file, then builds
    /// an orchestrator for it
    pub fn from_config_file(path: &Path) -> Result<Self, MirrorError> {
        let (config, hash) = load_config_with_hash(path)?;
        tracing::info!("Configuration loaded (hash: {})", hash);
        Self::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The page the crawl starts from
    pub fn seed(&self) -> Url {
        origin_root(&self.origin)
    }

    /// Entry points resolved against the origin
    pub fn entry_points(&self) -> Vec<Url> {
        self.config
            .site
            .entry_points
            .iter()
            .filter_map(|path| {
                let resolved = normalize(path, &self.origin);
                if resolved.is_none() {
                    tracing::warn!("Ignoring unresolvable entry point {:?}", path);
                }
                resolved
            })
            .collect()
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Runs the crawl and entry-point scans, returning all media found
    pub async fn discover(&mut self, summary: &mut RunSummary) -> BTreeSet<Url> {
        let seed = self.seed();
        tracing::info!("Starting crawl at {}", seed);

        let mut media_links = self.crawler.crawl(seed).await;
        summary.pages_crawled = self.crawler.pages_crawled();
        summary.pages_failed = self.crawler.failed_pages();

        for entry_point in self.entry_points() {
            match self.crawler.scan_entry_point(&entry_point).await {
                Ok(media) => {
                    tracing::debug!("{} media on entry point {}", media.len(), entry_point);
                    media_links.extend(media);
                }
                Err(e) => {
                    tracing::warn!("Cannot fetch entry point {}: {}", entry_point, e);
                    summary.entry_points_failed += 1;
                }
            }
        }

        media_links
    }

    /// Runs a full mirror pass
    ///
    /// Per-URL failures are logged and counted; only a failure to create the
    /// local media directory aborts the run.
    pub async fn run(&mut self) -> crate::Result<RunSummary> {
        let media_dir = self.downloader.media_dir();
        tokio::fs::create_dir_all(&media_dir).await?;

        let mut summary = RunSummary::new(media_dir);
        let media_links = self.discover(&mut summary).await;
        summary.media_found = media_links.len();
        tracing::info!("Total unique media to download: {}", media_links.len());

        let filter = self.crawler.filter();
        let outside_path = media_links
            .iter()
            .filter(|url| !filter.is_media_path(url))
            .count();
        if outside_path > 0 {
            tracing::debug!(
                "{} media references mention {} only outside their path",
                outside_path,
                filter.media_prefix()
            );
        }

        // BTreeSet iterates in sorted order
        for url in &media_links {
            let outcome = self.downloader.download(url).await;
            summary.record(&outcome);
        }

        summary.finish();
        tracing::info!(
            "Mirror complete: {} pages crawled, {} media found, {} downloaded",
            summary.pages_crawled,
            summary.media_found,
            summary.media_downloaded
        );

        Ok(summary)
    }
}

/// Runs a complete mirror operation for a configuration file
pub async fn run_mirror_from_file(path: &Path) -> crate::Result<RunSummary> {
    let mut orchestrator = Orchestrator::from_config_file(path)?;
    orchestrator.run().await
}

/// Runs a complete mirror operation for a loaded configuration
///
/// # Example
///
/// ```no_run
/// use media_mirror::config::load_config;
/// use media_mirror::crawler::run_mirror;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let summary = run_mirror(config).await?;
/// println!("{} files downloaded", summary.media_downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn run_mirror(config: Config) -> crate::Result<RunSummary> {
    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.run().await
}
