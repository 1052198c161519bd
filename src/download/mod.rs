//! Download module for mirroring media assets to disk

mod downloader;

pub use downloader::{DownloadOutcome, Downloader, CHUNK_SIZE};
