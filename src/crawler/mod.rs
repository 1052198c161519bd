//! Crawler module for page traversal and media discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and media
//! - HTML extraction of links and media references
//! - The breadth-first frontier with its page cap
//! - The crawl loop and the run orchestration around it

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod orchestrator;

pub use coordinator::Crawler;
pub use extractor::{extract_from_document, extract_page, srcset_candidates, PageResult};
pub use fetcher::{
    build_http_client, classify_error, fetch_page, fetch_streaming, with_read_timeout,
};
pub use frontier::Frontier;
pub use orchestrator::{run_mirror, run_mirror_from_file, Orchestrator};
