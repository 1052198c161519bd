use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Media-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The site being mirrored and the path rules applied to it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the site; its network location defines "same origin"
    pub origin: String,

    /// Path fragment identifying downloadable assets
    #[serde(rename = "media-prefix", default = "default_media_prefix")]
    pub media_prefix: String,

    /// Page paths eligible for crawling
    #[serde(rename = "allow-prefixes", default = "default_allow_prefixes")]
    pub allow_prefixes: Vec<String>,

    /// Page paths never crawled, checked before the allow list
    #[serde(rename = "deny-prefixes", default = "default_deny_prefixes")]
    pub deny_prefixes: Vec<String>,

    /// Extra origin-relative pages scanned for media without following links
    #[serde(rename = "entry-points", default)]
    pub entry_points: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages successfully fetched in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "crawl-delay", default = "default_crawl_delay")]
    pub crawl_delay: u64,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout: default_request_timeout(),
            crawl_delay: default_crawl_delay(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the remote URL paths are mirrored under
    #[serde(rename = "mirror-root", default = "default_mirror_root")]
    pub mirror_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mirror_root: default_mirror_root(),
        }
    }
}

fn default_media_prefix() -> String {
    "/media/product_images/".to_string()
}

fn default_allow_prefixes() -> Vec<String> {
    vec!["/".to_string(), "/products".to_string()]
}

fn default_deny_prefixes() -> Vec<String> {
    ["/admin", "/static", "/media", "/accounts/logout"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_max_pages() -> usize {
    500
}

fn default_request_timeout() -> u64 {
    15
}

fn default_crawl_delay() -> u64 {
    200
}

fn default_mirror_root() -> PathBuf {
    PathBuf::from(".")
}
