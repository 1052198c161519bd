/// Crawl state definitions for URLs seen during one run
///
/// Each URL moves forward only: unseen, then queued, then visited.
use std::fmt;

/// Represents where a URL is in the crawl lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// Never enqueued in this run
    Unseen,

    /// Waiting in the frontier queue
    Queued,

    /// Dequeued; never enqueued again, even if its fetch failed
    Visited,
}

impl UrlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Returns true if enqueueing a URL in this state adds it to the queue
    pub fn accepts_enqueue(&self) -> bool {
        matches!(self, Self::Unseen)
    }

    /// Returns true if moving from this state to `next` is a legal transition
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Queued) | (Self::Queued, Self::Visited)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Queued => "queued",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
