use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Minimum interval between chat-triggered re-index calls for one root.
pub const REINDEX_INTERVAL: Duration = Duration::from_secs(60);

/// Per-root record of when the backend index was last refreshed.
///
/// Lives for the editor session, never persisted. A root with no entry has
/// never been indexed and must be indexed before its first chat query.
#[derive(Debug)]
pub struct IndexThrottle {
    last_indexed: HashMap<PathBuf, Instant>,
    interval: Duration,
}

impl IndexThrottle {
    pub fn new() -> Self {
        Self::with_interval(REINDEX_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            last_indexed: HashMap::new(),
            interval,
        }
    }

    /// True when `root` has never been indexed or the window has elapsed.
    pub fn should_reindex(&self, root: &Path, now: Instant) -> bool {
        match self.last_indexed.get(root) {
            Some(last) => now.saturating_duration_since(*last) >= self.interval,
            None => true,
        }
    }

    pub fn mark_indexed(&mut self, root: &Path, now: Instant) {
        self.last_indexed.insert(root.to_path_buf(), now);
    }
}

impl Default for IndexThrottle {
    fn default() -> Self {
        Self::new()
    }
}
