//! Per-query freshness policy.

use std::time::Duration;

/// How long a cached value stays fresh and how long it is kept at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// After this, reads still return the value but trigger a refetch.
    pub stale_time: Duration,

    /// After this, the entry is evicted on the next read or write.
    pub cache_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            cache_time: Duration::from_secs(5 * 60),
        }
    }
}

impl QueryOptions {
    /// Options with the given staleness window and the default cache time.
    pub fn fresh_for(stale_time: Duration) -> Self {
        Self {
            stale_time,
            ..Default::default()
        }
    }

    /// Always refetch on read (used for polling).
    pub fn always_stale() -> Self {
        Self::default()
    }

    pub fn cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = QueryOptions::default();
        assert_eq!(options.stale_time, Duration::ZERO);
        assert_eq!(options.cache_time, Duration::from_secs(300));
    }

    #[test]
    fn test_builder() {
        let options =
            QueryOptions::fresh_for(Duration::from_secs(30)).cache_time(Duration::from_secs(60));
        assert_eq!(options.stale_time, Duration::from_secs(30));
        assert_eq!(options.cache_time, Duration::from_secs(60));
    }
}
