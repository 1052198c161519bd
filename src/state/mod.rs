//! State module for tracking crawl progress
//!
//! - `UrlState`: where a URL is in the frontier lifecycle (unseen, queued, visited)

mod url_state;

pub use url_state::UrlState;
