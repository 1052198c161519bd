//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests for page bodies
//! - Streaming GET requests for media downloads
//! - Error classification
//!
//! `request-timeout` bounds connecting and each wait for data, never a whole
//! transfer: a slow but steady download is allowed to finish.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::MirrorError;
use reqwest::{redirect::Policy, Client, Response};
use std::future::Future;
use std::time::Duration;
use url::Url;

const REDIRECT_LIMIT: usize = 10;

/// Builds the HTTP client used for every request of a run
///
/// The client has no overall deadline; `request-timeout` is applied as the
/// connect timeout here and per read by the fetch functions.
///
/// # Example
///
/// ```no_run
/// use media_mirror::config::{CrawlerConfig, UserAgentConfig};
/// use media_mirror::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "MediaMirror".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .connect_timeout(crawler.request_timeout())
        .redirect(Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text
///
/// Any non-2xx status is an error; the caller decides whether to skip.
/// Waiting for the response head and reading the body are each bounded by
/// `read_timeout`.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    read_timeout: Duration,
) -> Result<String, MirrorError> {
    let response = with_read_timeout(url, read_timeout, client.get(url.as_str()).send()).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    with_read_timeout(url, read_timeout, response.text()).await
}

/// Starts a GET request and hands back the response without reading the body
///
/// The status is not checked here so callers can report it; the body is
/// consumed incrementally with `Response::chunk`, each chunk under
/// [`with_read_timeout`].
pub async fn fetch_streaming(
    client: &Client,
    url: &Url,
    read_timeout: Duration,
) -> Result<Response, MirrorError> {
    with_read_timeout(url, read_timeout, client.get(url.as_str()).send()).await
}

/// Awaits one network step, failing with `Timeout` if it stalls for longer
/// than `limit`
pub async fn with_read_timeout<T, F>(url: &Url, limit: Duration, step: F) -> Result<T, MirrorError>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result.map_err(|e| classify_error(url, e)),
        Err(_) => Err(MirrorError::Timeout {
            url: url.to_string(),
        }),
    }
}

/// Maps a transport error to a `MirrorError` carrying the URL
pub fn classify_error(url: &Url, error: reqwest::Error) -> MirrorError {
    if error.is_timeout() {
        MirrorError::Timeout {
            url: url.to_string(),
        }
    } else {
        MirrorError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
