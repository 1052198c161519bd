//! URL handling module for Media-Mirror
//!
//! This module provides reference resolution and the path rules that split
//! discovered URLs into crawlable pages and media assets.

mod filter;
mod normalize;

pub use filter::PathFilter;
pub use normalize::{normalize, origin_root};
