//! Idempotent media downloader
//!
//! Maps each media URL onto `mirror-root/<url path>` and streams it to disk
//! unless the file already exists. The existence of the final file is the
//! only record of a completed download, so bodies are written to a sibling
//! `.part` file and renamed into place once complete.

use crate::config::CrawlerConfig;
use crate::crawler::{fetch_streaming, with_read_timeout};
use crate::MirrorError;
use reqwest::{Client, Response, StatusCode};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Write buffer size used while streaming a body to disk
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and written to `path`
    Downloaded { path: PathBuf, bytes: u64 },

    /// The local file already existed; nothing was fetched
    AlreadyPresent { path: PathBuf },

    /// The URL is not under the media prefix or cannot be mapped safely
    Rejected,

    /// The fetch or write failed; no file was left behind
    Failed,
}

impl DownloadOutcome {
    /// Returns true only for a fresh download
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }
}

/// Mirrors media URLs into a local directory tree
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    mirror_root: PathBuf,
    media_prefix: String,
    read_timeout: Duration,
}

impl Downloader {
    pub fn new(client: Client, mirror_root: impl Into<PathBuf>, media_prefix: impl Into<String>) -> Self {
        Self {
            client,
            mirror_root: mirror_root.into(),
            media_prefix: media_prefix.into(),
            read_timeout: CrawlerConfig::default().request_timeout(),
        }
    }

    /// Sets how long a download may wait for its next chunk before failing
    ///
    /// The transfer as a whole is unbounded while data keeps arriving.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn mirror_root(&self) -> &Path {
        &self.mirror_root
    }

    /// Local directory that media under the prefix lands in
    pub fn media_dir(&self) -> PathBuf {
        self.mirror_root
            .join(self.media_prefix.trim_start_matches('/'))
    }

    /// Maps a media URL to its local file path
    ///
    /// The URL path (still percent-encoded, as served) minus its leading `/`
    /// is joined onto the mirror root. Paths that would not name a plain file
    /// beneath the root are refused.
    pub fn local_path(&self, url: &Url) -> Result<PathBuf, MirrorError> {
        let relative = Path::new(url.path().trim_start_matches('/'));

        let is_plain_file = !url.path().ends_with('/')
            && relative.components().next().is_some()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !is_plain_file {
            return Err(MirrorError::UnsafePath {
                url: url.to_string(),
            });
        }

        Ok(self.mirror_root.join(relative))
    }

    /// Downloads a media URL if it is not mirrored yet
    ///
    /// Returns true only when a new file was written.
    pub async fn save(&self, url: &Url) -> bool {
        self.download(url).await.is_new()
    }

    /// Downloads a media URL and reports what happened
    ///
    /// Failures are logged here and never propagate.
    pub async fn download(&self, url: &Url) -> DownloadOutcome {
        if !url.path().starts_with(self.media_prefix.as_str()) {
            tracing::debug!("Skipping {}: outside {}", url, self.media_prefix);
            return DownloadOutcome::Rejected;
        }

        let path = match self.local_path(url) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{}", e);
                return DownloadOutcome::Rejected;
            }
        };

        match self.fetch_to(url, &path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Failed: {}: {}", url, e);
                DownloadOutcome::Failed
            }
        }
    }

    async fn fetch_to(&self, url: &Url, path: &Path) -> Result<DownloadOutcome, MirrorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(path).await? {
            tracing::debug!("Already exists: {}", path.display());
            return Ok(DownloadOutcome::AlreadyPresent {
                path: path.to_path_buf(),
            });
        }

        let response = fetch_streaming(&self.client, url, self.read_timeout).await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Failed ({}): {}", status.as_u16(), url);
            return Ok(DownloadOutcome::Failed);
        }

        let partial = partial_path(path);
        let bytes = match write_body(response, &partial, url, self.read_timeout).await {
            Ok(bytes) => bytes,
            Err(e) => {
                discard_partial(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial, path).await {
            discard_partial(&partial).await;
            return Err(e.into());
        }

        tracing::info!("Downloaded: {} -> {}", url, path.display());
        Ok(DownloadOutcome::Downloaded {
            path: path.to_path_buf(),
            bytes,
        })
    }
}

/// `shoe.jpg` -> `shoe.jpg.part`, in the same directory
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Removes a `.part` file left by a failed download
async fn discard_partial(partial: &Path) {
    match fs::remove_file(partial).await {
        Ok(()) => tracing::debug!("Removed {}", partial.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove {}: {}", partial.display(), e),
    }
}

async fn write_body(
    mut response: Response,
    partial: &Path,
    url: &Url,
    read_timeout: Duration,
) -> Result<u64, MirrorError> {
    let file = fs::File::create(partial).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut total = 0u64;

    while let Some(chunk) = with_read_timeout(url, read_timeout, response.chunk()).await? {
        writer.write_all(&chunk).await?;
        total += chunk.len() as u64;
    }

    writer.flush().await?;
    Ok(total)
}
