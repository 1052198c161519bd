//! Breadth-first crawl frontier
//!
//! A FIFO queue of pending URLs guarded by a per-URL state map, bounded by a
//! maximum number of successfully crawled pages.

use crate::state::UrlState;
use std::collections::{HashMap, VecDeque};
use url::Url;

/// Crawl work queue with visited-set deduplication and a page cap
#[derive(Debug)]
pub struct Frontier {
    /// Queued and visited URLs; anything absent is unseen
    states: HashMap<Url, UrlState>,

    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<Url>,

    /// Pages successfully fetched so far
    pages_crawled: usize,

    /// Safety bound on `pages_crawled`
    max_pages: usize,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(max_pages: usize) -> Self {
        Self {
            states: HashMap::new(),
            queue: VecDeque::new(),
            pages_crawled: 0,
            max_pages,
        }
    }

    /// Creates a frontier holding a single seed URL
    pub fn with_seed(seed: Url, max_pages: usize) -> Self {
        let mut frontier = Self::new(max_pages);
        frontier.enqueue(seed);
        frontier
    }

    /// Returns the lifecycle state of a URL
    pub fn state_of(&self, url: &Url) -> UrlState {
        self.states.get(url).copied().unwrap_or(UrlState::Unseen)
    }

    /// Adds an unseen URL to the tail of the queue
    ///
    /// Returns false (and does nothing) if the URL is already queued or visited.
    pub fn enqueue(&mut self, url: Url) -> bool {
        let current = self.state_of(&url);
        if !current.accepts_enqueue() {
            return false;
        }

        debug_assert!(current.can_transition_to(UrlState::Queued));
        self.states.insert(url.clone(), UrlState::Queued);
        self.queue.push_back(url);
        true
    }

    /// Pops the head of the queue and marks it visited
    ///
    /// Returns `None` once the queue is empty or the page cap is reached.
    pub fn dequeue(&mut self) -> Option<Url> {
        if self.cap_reached() {
            return None;
        }

        let url = self.queue.pop_front()?;
        debug_assert!(self.state_of(&url).can_transition_to(UrlState::Visited));
        self.states.insert(url.clone(), UrlState::Visited);
        Some(url)
    }

    /// Counts one successfully fetched page and returns the new total
    pub fn record_page(&mut self) -> usize {
        self.pages_crawled += 1;
        self.pages_crawled
    }

    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn cap_reached(&self) -> bool {
        self.pages_crawled >= self.max_pages
    }

    /// Number of URLs waiting in the queue
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of URLs that have been dequeued
    pub fn visited_len(&self) -> usize {
        self.states
            .values()
            .filter(|state| state.is_terminal())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
