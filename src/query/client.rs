//! Query client - the single owner of fetched data.
//!
//! Complements the API client with:
//! - Per-key caching with staleness windows
//! - Request coalescing (at most one in-flight fetch per key)
//! - Prefix invalidation after mutations
//!
//! The client is explicitly constructed and cheap to clone; every clone
//! shares the same cache. There is no global instance.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{QueryKey, QueryOptions};
use crate::error::{DashboardError, Result};

type Erased = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Erased>>>;

/// Cached value plus the moment it was written
struct CacheEntry {
    value: Erased,
    updated_at: Instant,
    cache_time: Duration,
}

/// A fetch in progress. `id` identifies the fetch so that a result
/// arriving after invalidation is not written back.
struct InFlight {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    in_flight: Mutex<HashMap<QueryKey, InFlight>>,
    next_fetch_id: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

/// Result of a stale-while-revalidate read
#[derive(Debug)]
pub struct QueryResult<T> {
    pub data: Arc<T>,
    /// The data is older than the staleness window
    pub is_stale: bool,
    /// A background refetch was started (or joined) by this read
    pub is_refetching: bool,
}

/// Query cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub entries: usize,
    pub in_flight: usize,
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
}

#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Stale-while-revalidate read.
    ///
    /// Fresh data is returned as is. Stale data is returned immediately and a
    /// background refetch is started. With nothing cached, the fetch is
    /// awaited.
    pub async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<QueryResult<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some((data, is_stale)) = self.peek::<T>(&key, &options).await? {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            if is_stale {
                debug!(key = %key, "Serving stale data, refetching in background");
                // The spawned driver keeps the fetch alive; nobody awaits it here
                drop(self.shared_fetch(&key, options, fetcher).await);
            } else {
                debug!(key = %key, "Query cache hit");
            }
            return Ok(QueryResult {
                data,
                is_stale,
                is_refetching: is_stale,
            });
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        let data = self.await_fetch(&key, options, fetcher).await?;
        Ok(QueryResult {
            data,
            is_stale: false,
            is_refetching: false,
        })
    }

    /// Read that always resolves to fresh data: the fetch is awaited when
    /// the entry is missing or stale.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some((data, false)) = self.peek::<T>(&key, &options).await? {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Query cache hit");
            return Ok(data);
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        self.await_fetch(&key, options, fetcher).await
    }

    /// Cached value regardless of staleness
    pub async fn get_query_data<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<Arc<T>>> {
        let entries = self.inner.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| downcast(key, entry.value.clone()))
            .transpose()
    }

    /// Whether a fetch for this key is currently pending
    pub async fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner.in_flight.lock().await.contains_key(key)
    }

    // =========================================================================
    // Invalidation / lifecycle
    // =========================================================================

    /// Remove every entry whose key starts with `prefix` and detach matching
    /// in-flight fetches so their results are not written back. Returns the
    /// number of cached entries removed.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.inner.entries.lock().await;
        let mut in_flight = self.inner.in_flight.lock().await;

        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();

        let detached_before = in_flight.len();
        in_flight.retain(|key, _| !key.starts_with(prefix));
        let detached = detached_before - in_flight.len();

        debug!(prefix = %prefix, removed, detached, "Invalidated queries");
        removed
    }

    /// Drop entries older than their cache time. Returns the number removed.
    ///
    /// Completed fetches already sweep the cache; this is for callers that
    /// want memory back while the client sits idle.
    pub async fn collect_garbage(&self) -> usize {
        let mut entries = self.inner.entries.lock().await;
        sweep_expired(&mut entries)
    }

    /// Teardown: forget all cached data and detach all pending fetches.
    pub async fn clear(&self) {
        let mut entries = self.inner.entries.lock().await;
        let mut in_flight = self.inner.in_flight.lock().await;
        entries.clear();
        in_flight.clear();
    }

    pub async fn stats(&self) -> QueryStats {
        let entries = self.inner.entries.lock().await.len();
        let in_flight = self.inner.in_flight.lock().await.len();
        QueryStats {
            entries,
            in_flight,
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            fetches: self.inner.fetches.load(Ordering::Relaxed),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Cached value and whether it is stale under `options`
    async fn peek<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
    ) -> Result<Option<(Arc<T>, bool)>> {
        let mut entries = self.inner.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                debug!(key = %key, "Dropping expired entry");
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => {
                let is_stale = entry.updated_at.elapsed() >= options.stale_time;
                let data = downcast(key, entry.value.clone())?;
                Ok(Some((data, is_stale)))
            }
            None => Ok(None),
        }
    }

    async fn await_fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let erased = self.shared_fetch(key, options, fetcher).await.await?;
        downcast(key, erased)
    }

    /// Join the pending fetch for `key`, or start one.
    ///
    /// A started fetch is driven by its own task, so it completes (and
    /// populates the cache) even if every caller stops waiting.
    async fn shared_fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut in_flight = self.inner.in_flight.lock().await;
        if let Some(pending) = in_flight.get(key) {
            debug!(key = %key, "Joining in-flight fetch");
            return pending.future.clone();
        }

        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        self.inner.fetches.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, fetch_id = id, "Starting fetch");

        let inner = Arc::clone(&self.inner);
        let owned_key = key.clone();
        let future = async move {
            let result = fetcher().await.map(|value| Arc::new(value) as Erased);
            inner.settle(&owned_key, id, options, &result).await;
            result
        }
        .boxed()
        .shared();

        in_flight.insert(
            key.clone(),
            InFlight {
                id,
                future: future.clone(),
            },
        );
        tokio::spawn(future.clone());
        future
    }
}

impl Inner {
    /// Record a finished fetch. Results of detached fetches are dropped and
    /// failures are never cached.
    async fn settle(&self, key: &QueryKey, id: u64, options: QueryOptions, result: &Result<Erased>) {
        let mut entries = self.entries.lock().await;
        let mut in_flight = self.in_flight.lock().await;

        if in_flight.get(key).map(|pending| pending.id) != Some(id) {
            debug!(key = %key, fetch_id = id, "Discarding result of detached fetch");
            return;
        }
        in_flight.remove(key);

        match result {
            Ok(value) => {
                // Every write also evicts whatever outlived its cache time
                sweep_expired(&mut entries);
                entries.insert(
                    key.clone(),
                    CacheEntry {
                        value: value.clone(),
                        updated_at: Instant::now(),
                        cache_time: options.cache_time,
                    },
                );
                debug!(key = %key, fetch_id = id, "Fetch complete");
            }
            Err(e) => warn!(key = %key, fetch_id = id, error = %e, "Fetch failed"),
        }
    }
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.updated_at.elapsed() >= self.cache_time
    }
}

/// Remove entries older than their cache time. Returns the number removed.
fn sweep_expired(entries: &mut HashMap<QueryKey, CacheEntry>) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired());
    let removed = before - entries.len();
    if removed > 0 {
        debug!(removed, "Collected expired query entries");
    }
    removed
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: Erased) -> Result<Arc<T>> {
    value
        .downcast::<T>()
        .map_err(|_| DashboardError::TypeMismatch { key: key.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counted(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32>> + Send + 'static {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_hit_does_not_refetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("corporations");
        let options = QueryOptions::fresh_for(Duration::from_secs(60));

        let first = client.query(key.clone(), options, counted(&calls, 1)).await.unwrap();
        let second = client.query(key.clone(), options, counted(&calls, 2)).await.unwrap();

        assert_eq!(*first.data, 1);
        assert_eq!(*second.data, 1);
        assert!(!second.is_stale);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_read_returns_cached_and_refetches() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("dashboard");
        let options = QueryOptions::fresh_for(Duration::from_secs(10));

        client.query(key.clone(), options, counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;

        let stale = client.query(key.clone(), options, counted(&calls, 2)).await.unwrap();
        assert_eq!(*stale.data, 1);
        assert!(stale.is_stale);
        assert!(stale.is_refetching);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let refreshed: Option<Arc<u32>> = client.get_query_data(&key).await.unwrap();
        assert_eq!(refreshed.as_deref(), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_reads_share_one_fetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("signals");

        let (a, b, c) = tokio::join!(
            client.fetch_query(key.clone(), QueryOptions::default(), counted(&calls, 7)),
            client.fetch_query(key.clone(), QueryOptions::default(), counted(&calls, 8)),
            client.fetch_query(key.clone(), QueryOptions::default(), counted(&calls, 9)),
        );

        assert_eq!(*a.unwrap(), 7);
        assert_eq!(*b.unwrap(), 7);
        assert_eq!(*c.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.stats().await.fetches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_reach_every_waiter_and_are_not_cached() {
        let client = QueryClient::new();
        let key = QueryKey::new("signal").push("missing");

        let failing = || async { Err::<u32, _>(DashboardError::Config("boom".into())) };
        let (a, b) = tokio::join!(
            client.fetch_query(key.clone(), QueryOptions::default(), failing),
            client.fetch_query(key.clone(), QueryOptions::default(), failing),
        );

        assert!(a.is_err());
        assert!(b.is_err());
        assert_eq!(client.stats().await.entries, 0);
        assert!(!client.is_fetching(&key).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_removes_matching_prefix() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::fresh_for(Duration::from_secs(60));

        let list = QueryKey::new("signals").param("status", Some("NEW"));
        let detail = QueryKey::new("signal").push("sig-1");
        client.fetch_query(list.clone(), options, counted(&calls, 1)).await.unwrap();
        client.fetch_query(detail.clone(), options, counted(&calls, 2)).await.unwrap();

        let removed = client.invalidate(&QueryKey::new("signals")).await;
        assert_eq!(removed, 1);

        let list_data: Option<Arc<u32>> = client.get_query_data(&list).await.unwrap();
        let detail_data: Option<Arc<u32>> = client.get_query_data(&detail).await.unwrap();
        assert!(list_data.is_none());
        assert!(detail_data.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidated_in_flight_fetch_is_not_written_back() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("signals");

        let pending = {
            let client = client.clone();
            let key = key.clone();
            let fetcher = counted(&calls, 1);
            tokio::spawn(async move {
                client.fetch_query(key, QueryOptions::default(), fetcher).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(client.is_fetching(&key).await);

        client.invalidate(&key).await;
        assert_eq!(*pending.await.unwrap().unwrap(), 1);

        let cached: Option<Arc<u32>> = client.get_query_data(&key).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_reported() {
        let client = QueryClient::new();
        let key = QueryKey::new("summary");
        client
            .fetch_query(key.clone(), QueryOptions::default(), || async { Ok(1u32) })
            .await
            .unwrap();

        let wrong: Result<Option<Arc<String>>> = client.get_query_data(&key).await;
        assert!(matches!(wrong, Err(DashboardError::TypeMismatch { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_collection_and_clear() {
        let client = QueryClient::new();
        let short = QueryOptions::default().cache_time(Duration::from_secs(1));
        let long = QueryOptions::default().cache_time(Duration::from_secs(600));

        client
            .fetch_query(QueryKey::new("a"), short, || async { Ok(1u32) })
            .await
            .unwrap();
        client
            .fetch_query(QueryKey::new("b"), long, || async { Ok(2u32) })
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(client.collect_garbage().await, 1);
        assert_eq!(client.stats().await.entries, 1);

        client.clear().await;
        assert_eq!(client.stats().await.entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_evicted_by_later_writes() {
        let client = QueryClient::new();
        let short = QueryOptions::default().cache_time(Duration::from_secs(1));

        for id in ["signal/1", "signal/2", "signal/3"] {
            client
                .fetch_query(QueryKey::new(id), short, || async { Ok(1u32) })
                .await
                .unwrap();
        }
        assert_eq!(client.stats().await.entries, 3);

        tokio::time::advance(Duration::from_secs(2)).await;
        client
            .fetch_query(QueryKey::new("signal-stats"), short, || async { Ok(9u32) })
            .await
            .unwrap();

        assert_eq!(client.stats().await.entries, 1);
        let gone: Option<Arc<u32>> = client
            .get_query_data(&QueryKey::new("signal/1"))
            .await
            .unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched_not_served() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("corporations");
        let options = QueryOptions::fresh_for(Duration::from_secs(60))
            .cache_time(Duration::from_secs(30));

        client.query(key.clone(), options, counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        let result = client.query(key.clone(), options, counted(&calls, 2)).await.unwrap();
        assert_eq!(*result.data, 2);
        assert!(!result.is_stale);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.stats().await.misses, 2);
    }
}
