//! # Feed
//!
//! The in-memory tweet list. Every committed fetch replaces it wholesale:
//! no merge, no de-duplication, order exactly as the remote returned it.
//!
//! Refreshes are tagged with a generation number. Only the most recently
//! issued refresh may commit, so a slow response from an earlier refresh
//! can never overwrite a newer list.

use crate::api::Tweet;

/// Why a refresh was issued. Decides which notifications accompany it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    /// Initial load when the app starts.
    Startup,
    /// The user asked for it (refresh key or sidebar).
    Manual,
    /// Follows a successful post.
    AfterPost,
}

#[derive(Debug, Default)]
pub struct Feed {
    tweets: Vec<Tweet>,
    /// Generation of the most recently issued refresh.
    issued: u64,
    /// Generation of the most recent refresh that committed or failed.
    settled: u64,
    /// Generation whose data is currently held (0 = never loaded).
    committed: u64,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    /// Generation of the data currently held; changes whenever the list is replaced.
    pub fn committed_generation(&self) -> u64 {
        self.committed
    }

    /// True while the latest issued refresh has not settled.
    pub fn is_refreshing(&self) -> bool {
        self.issued > self.settled
    }

    /// Issues a new refresh and returns its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Replaces the held list if `generation` is the latest issued refresh.
    ///
    /// Returns `false` (and leaves the feed untouched) for stale generations.
    pub fn commit(&mut self, generation: u64, tweets: Vec<Tweet>) -> bool {
        if generation != self.issued {
            return false;
        }
        self.tweets = tweets;
        self.committed = generation;
        self.settled = generation;
        true
    }

    /// Marks the latest refresh as failed. The held list is kept.
    ///
    /// Returns `false` for stale generations.
    pub fn fail(&mut self, generation: u64) -> bool {
        if generation != self.issued {
            return false;
        }
        self.settled = generation;
        true
    }
}
