//! Process-wide keyed query cache with single-flight loads.
//!
//! Every key maps to one slot holding the last settled value, the last
//! error, the settle time and at most one in-flight load. Concurrent
//! `fetch` calls for a key attach to the load already running instead of
//! starting another one. Loads run on their own tokio task, so a caller
//! that stops waiting never strands the slot: the result still lands in
//! the cache under the key that requested it.
//!
//! The cache is an explicit object, constructed once per
//! [`CatalogSession`](crate::CatalogSession) and cleared on shutdown.
//!
//! Slots nobody has read for longer than the collection window
//! ([`QueryCache::with_gc_time`]) are dropped whenever a load settles, so
//! one-off keys such as individual search terms do not pile up.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::FutureExt;
use futures::future::{AbortHandle, BoxFuture, Shared, abortable};
use tokio::time::{Duration, Instant};

use crate::error::QueryError;

type AnyValue = Arc<dyn Any + Send + Sync>;
type Outcome = Result<AnyValue, QueryError>;
type InFlight = Shared<BoxFuture<'static, Outcome>>;

/// How long an idle slot is kept before it may be collected.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(30 * 60);

/// Identity of a query: an ordered list of string parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// One listing page: `["pokemons", page, page_size]`.
    pub fn page(page: u32, page_size: u32) -> Self {
        Self::new(["pokemons".to_string(), page.to_string(), page_size.to_string()])
    }

    pub fn entity(id: u32) -> Self {
        Self::new(["pokemon".to_string(), id.to_string()])
    }

    pub fn species(id: u32) -> Self {
        Self::new(["species".to_string(), id.to_string()])
    }

    pub fn evolution(url: &str) -> Self {
        Self::new(["evolution", url])
    }

    pub fn type_relations(type_id: &str) -> Self {
        Self::new(["type", type_id])
    }

    /// Results of one search term.
    pub fn search(term: &str) -> Self {
        Self::new(["pokemonSearch", term])
    }

    /// Bulk name listing searches filter against.
    pub fn search_candidates(limit: u32) -> Self {
        Self::new(["search-candidates".to_string(), limit.to_string()])
    }

    /// Flattened entries of every cached listing page.
    pub fn search_cache() -> Self {
        Self::new(["pokemon-search-cache"])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len() && self.0.iter().zip(prefix).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Snapshot of one cache slot.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    pub last_fetched_at: Option<Instant>,
    pub is_fetching: bool,
    invalidated: bool,
}

impl<T> CacheEntry<T> {
    fn empty() -> Self {
        Self {
            data: None,
            error: None,
            last_fetched_at: None,
            is_fetching: false,
            invalidated: false,
        }
    }

    /// Has data from a successful load younger than `stale_time`.
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        is_fresh(
            self.data.is_some(),
            self.error.is_some(),
            self.invalidated,
            self.last_fetched_at,
            stale_time,
        )
    }

    /// Nothing has settled yet: no data and no error.
    pub fn is_pending(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

fn is_fresh(
    has_data: bool,
    has_error: bool,
    invalidated: bool,
    last_fetched_at: Option<Instant>,
    stale_time: Duration,
) -> bool {
    has_data
        && !has_error
        && !invalidated
        && last_fetched_at.is_some_and(|t| t.elapsed() < stale_time)
}

/// Whether a failed load is surfaced to a caller or only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Foreground,
    Background,
}

struct Flight {
    ticket: u64,
    shared: InFlight,
    abort: AbortHandle,
}

#[derive(Default)]
struct Slot {
    data: Option<AnyValue>,
    error: Option<QueryError>,
    last_fetched_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<Flight>,
    /// Last time a caller read, loaded or stored this key.
    last_used: Option<Instant>,
}

impl Slot {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        is_fresh(
            self.data.is_some(),
            self.error.is_some(),
            self.invalidated,
            self.last_fetched_at,
            stale_time,
        )
    }

    fn touch(&mut self) {
        self.last_used = Some(Instant::now());
    }

    fn is_collectable(&self, gc_time: Duration) -> bool {
        self.in_flight.is_none() && self.last_used.is_none_or(|t| t.elapsed() >= gc_time)
    }
}

enum Begin {
    Fresh(AnyValue),
    Joined(InFlight),
    Started(InFlight),
}

struct Inner {
    slots: Mutex<HashMap<QueryKey, Slot>>,
    next_ticket: AtomicU64,
    gc_time: Duration,
}

/// Shared handle to the query cache. Clones share the same slots.
///
/// Loads are spawned with `tokio::spawn`, so `fetch` and `prefetch` must be
/// called from within a tokio runtime.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_gc_time(DEFAULT_GC_TIME)
    }

    /// Cache whose idle slots are collected after `gc_time` without use.
    pub fn with_gc_time(gc_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(HashMap::new()),
                next_ticket: AtomicU64::new(0),
                gc_time,
            }),
        }
    }

    pub fn gc_time(&self) -> Duration {
        self.inner.gc_time
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the value for `key`.
    ///
    /// Attaches to an in-flight load if there is one, returns fresh data
    /// without calling `loader`, and otherwise runs `loader`. A failed load
    /// stores its error and is not retried until the next call.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        loader: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let value = match self.begin(&key, stale_time, loader, Origin::Foreground) {
            Begin::Fresh(value) => value,
            Begin::Joined(flight) | Begin::Started(flight) => flight.await?,
        };
        downcast(&key, value)
    }

    /// Stale-while-revalidate read.
    ///
    /// Returns cached data immediately, even if stale, and schedules a
    /// background refetch when it is. Falls back to [`fetch`](Self::fetch)
    /// when nothing is cached.
    pub async fn fetch_or_stale<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        loader: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let cached = self.slots().get_mut(&key).and_then(|s| {
            s.touch();
            s.data.clone()
        });
        match cached {
            Some(value) => {
                self.prefetch(key.clone(), stale_time, loader);
                downcast(&key, value)
            }
            None => self.fetch(key, stale_time, loader).await,
        }
    }

    /// Warm `key` in the background.
    ///
    /// Skipped when the slot is fresh or already loading. Never blocks;
    /// failures are logged and discarded.
    pub fn prefetch<T, F, Fut>(&self, key: QueryKey, stale_time: Duration, loader: F)
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        match self.begin(&key, stale_time, loader, Origin::Background) {
            Begin::Started(_) => log::debug!("Prefetching {}", key),
            Begin::Joined(_) | Begin::Fresh(_) => log::debug!("Prefetch of {} skipped", key),
        }
    }

    fn begin<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
        loader: F,
        origin: Origin,
    ) -> Begin
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>> + Send + 'static,
    {
        let mut slots = self.slots();
        let slot = slots.entry(key.clone()).or_default();
        slot.touch();

        if let Some(flight) = &slot.in_flight {
            log::debug!("Query {} already in flight, attaching", key);
            return Begin::Joined(flight.shared.clone());
        }
        if slot.is_fresh(stale_time) {
            if let Some(data) = &slot.data {
                log::debug!("Query {} served from cache", key);
                return Begin::Fresh(data.clone());
            }
        }

        log::debug!("Query {} loading", key);
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        let (load, abort) = abortable(loader());
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let settle_key = key.clone();

        let shared = async move {
            let outcome: Outcome = match load.await {
                Ok(result) => result.map(|v| Arc::new(v) as AnyValue),
                Err(_aborted) => Err(QueryError::Abandoned {
                    key: settle_key.to_string(),
                }),
            };
            if let Some(inner) = weak.upgrade() {
                QueryCache { inner }.settle(&settle_key, ticket, &outcome, origin);
            }
            outcome
        }
        .boxed()
        .shared();

        let driver = shared.clone();
        tokio::spawn(async move {
            let _ = driver.await;
        });

        slot.in_flight = Some(Flight {
            ticket,
            shared: shared.clone(),
            abort,
        });
        Begin::Started(shared)
    }

    /// Record a settled load. Last write wins; the in-flight marker is only
    /// cleared by the load that set it.
    fn settle(&self, key: &QueryKey, ticket: u64, outcome: &Outcome, origin: Origin) {
        let mut slots = self.slots();
        collect_idle(&mut slots, self.inner.gc_time);
        let Some(slot) = slots.get_mut(key) else {
            log::debug!("Query {} settled after removal, dropping result", key);
            return;
        };
        if slot.in_flight.as_ref().is_some_and(|f| f.ticket == ticket) {
            slot.in_flight = None;
        }
        match outcome {
            Ok(value) => {
                slot.data = Some(value.clone());
                slot.error = None;
            }
            Err(QueryError::Abandoned { .. }) => return,
            Err(e) => {
                match origin {
                    Origin::Background => log::warn!("Background fetch of {} failed: {}", key, e),
                    Origin::Foreground => log::debug!("Query {} failed: {}", key, e),
                }
                slot.error = Some(e.clone());
            }
        }
        slot.last_fetched_at = Some(Instant::now());
        slot.invalidated = false;
        slot.touch();
    }

    /// Drop every slot that is not loading and has not been used for the
    /// collection window. Returns how many were dropped.
    pub fn collect_garbage(&self) -> usize {
        collect_idle(&mut self.slots(), self.inner.gc_time)
    }

    /// Snapshot of the slot for `key`. A slot holding a different type
    /// reads as having no data.
    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> CacheEntry<T> {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(key) else {
            return CacheEntry::empty();
        };
        slot.touch();
        CacheEntry {
            data: slot.data.clone().and_then(|v| v.downcast::<T>().ok()),
            error: slot.error.clone(),
            last_fetched_at: slot.last_fetched_at,
            is_fetching: slot.in_flight.is_some(),
            invalidated: slot.invalidated,
        }
    }

    /// Wait for the in-flight load of `key`, if any, to settle.
    pub async fn settled(&self, key: &QueryKey) {
        let flight = self
            .slots()
            .get(key)
            .and_then(|s| s.in_flight.as_ref())
            .map(|f| f.shared.clone());
        if let Some(flight) = flight {
            let _ = flight.await;
        }
    }

    /// Store `value` under `key` as a freshly settled result.
    pub fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut slots = self.slots();
        let slot = slots.entry(key).or_default();
        slot.data = Some(Arc::new(value));
        slot.error = None;
        slot.last_fetched_at = Some(Instant::now());
        slot.invalidated = false;
        slot.touch();
    }

    /// Mark `key` stale so the next fetch reloads it. Data is kept.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(slot) = self.slots().get_mut(key) {
            slot.invalidated = true;
        }
    }

    /// Mark every key starting with `prefix` stale.
    pub fn invalidate_prefix(&self, prefix: &[&str]) {
        for (key, slot) in self.slots().iter_mut() {
            if key.starts_with(prefix) {
                slot.invalidated = true;
            }
        }
    }

    /// Drop the slot for `key`, cancelling its load if one is running.
    pub fn remove(&self, key: &QueryKey) {
        let removed = self.slots().remove(key);
        if let Some(flight) = removed.and_then(|slot| slot.in_flight) {
            flight.abort.abort();
        }
    }

    /// Data of every slot whose key starts with `prefix` and holds a `T`.
    pub fn entries_with_prefix<T: Send + Sync + 'static>(
        &self,
        prefix: &[&str],
    ) -> Vec<(QueryKey, Arc<T>)> {
        let slots = self.slots();
        let mut out: Vec<_> = slots
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter_map(|(key, slot)| {
                let value = slot.data.clone()?.downcast::<T>().ok()?;
                Some((key.clone(), value))
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Cancel every in-flight load and drop all slots.
    pub fn clear(&self) {
        let drained: Vec<Slot> = self.slots().drain().map(|(_, slot)| slot).collect();
        let mut cancelled = 0;
        for flight in drained.into_iter().filter_map(|s| s.in_flight) {
            flight.abort.abort();
            cancelled += 1;
        }
        log::debug!("Query cache cleared ({} loads cancelled)", cancelled);
    }
}

fn collect_idle(slots: &mut HashMap<QueryKey, Slot>, gc_time: Duration) -> usize {
    let before = slots.len();
    slots.retain(|_, slot| !slot.is_collectable(gc_time));
    let dropped = before - slots.len();
    if dropped > 0 {
        log::debug!("Collected {} idle queries", dropped);
    }
    dropped
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: AnyValue) -> Result<Arc<T>, QueryError> {
    value.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
        key: key.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/query_cache_tests.rs"]
mod tests;
