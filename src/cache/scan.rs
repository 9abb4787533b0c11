//! TTL + LRU memoization with in-flight deduplication.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::error::{CacheError, CacheResult};

type Outcome<V> = Option<CacheResult<V>>;

/// Longest honored TTL (about a century). Larger values, `Duration::MAX` included, are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now + ttl.min(MAX_TTL)
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
    tick: u64,
}

struct InFlight<V> {
    id: u64,
    done: watch::Receiver<Outcome<V>>,
}

struct CacheState<V> {
    entries: HashMap<String, Entry<V>>,
    /// Access order: smallest tick is least recently used.
    recency: BTreeMap<u64, String>,
    in_flight: HashMap<String, InFlight<V>>,
    next_tick: u64,
    next_flight: u64,
}

impl<V: Clone> CacheState<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            in_flight: HashMap::new(),
            next_tick: 0,
            next_flight: 0,
        }
    }

    fn bump_tick(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn remove_entry(&mut self, key: &str) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.tick);
        Some(entry.value)
    }

    /// Returns a live value and marks it most recently used; drops it if expired.
    fn get_fresh(&mut self, key: &str, now: Instant) -> Option<V> {
        let expired = now >= self.entries.get(key)?.expires_at;
        if expired {
            self.remove_entry(key);
            return None;
        }

        let tick = self.bump_tick();
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.tick);
        entry.tick = tick;
        self.recency.insert(tick, key.to_string());
        Some(entry.value.clone())
    }

    fn insert(&mut self, key: &str, value: V, expires_at: Instant, capacity: usize) -> usize {
        let tick = self.bump_tick();
        match self.entries.get_mut(key) {
            Some(entry) => {
                self.recency.remove(&entry.tick);
                entry.value = value;
                entry.expires_at = expires_at;
                entry.tick = tick;
            }
            None => {
                self.entries.insert(
                    key.to_string(),
                    Entry {
                        value,
                        expires_at,
                        tick,
                    },
                );
            }
        }
        self.recency.insert(tick, key.to_string());

        let mut evicted = 0;
        while self.entries.len() > capacity {
            let Some((_, lru_key)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&lru_key);
            evicted += 1;
        }
        evicted
    }

    /// Removes the in-flight marker only if it still belongs to flight `id`.
    fn clear_flight(&mut self, key: &str, id: u64) {
        if self.in_flight.get(key).is_some_and(|f| f.id == id) {
            self.in_flight.remove(key);
        }
    }
}

enum Role<V> {
    Hit(V),
    Waiter(watch::Receiver<Outcome<V>>),
    Leader(watch::Sender<Outcome<V>>, u64),
}

/// Clears the in-flight marker if the computing future is dropped before committing.
struct FlightGuard<V: Clone> {
    state: Arc<Mutex<CacheState<V>>>,
    key: String,
    id: u64,
    armed: bool,
}

impl<V: Clone> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        if self.armed {
            warn!(key = %self.key, "Scan computation dropped before completion");
            self.state.lock().clear_flight(&self.key, self.id);
        }
    }
}

/// Concurrency-safe result cache keyed by string.
///
/// Entries expire after their TTL (checked lazily on access) and the least recently used
/// entry is evicted once `capacity` is exceeded. [`ScanCache::get_or_compute`] guarantees at
/// most one concurrent computation per key; concurrent callers share its outcome.
///
/// Cloning is cheap and yields a handle to the same cache.
pub struct ScanCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    capacity: usize,
}

impl<V> Clone for ScanCache<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            capacity: self.capacity,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> ScanCache<V> {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a live entry, expiring it first if its TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<V> {
        self.state.lock().get_fresh(key, Instant::now())
    }

    /// Inserts or refreshes an entry. A zero `ttl` is a no-op; TTLs above [`MAX_TTL`] are clamped.
    pub fn insert(&self, key: &str, value: V, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let evicted = self
            .state
            .lock()
            .insert(key, value, expiry(Instant::now(), ttl), self.capacity);
        if evicted > 0 {
            debug!(evicted, "Scan cache evicted LRU entries");
        }
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.state.lock().remove_entry(key)
    }

    /// Number of stored entries, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
    }

    /// Number of computations currently running.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Returns the cached value for `key`, or runs `compute` once for all concurrent callers.
    ///
    /// `compute` runs without the cache lock held. Successful results are cached for `ttl`;
    /// failures are shared with concurrent waiters but never cached.
    #[instrument(skip(self, compute), fields(ttl_secs = ttl.as_secs()))]
    pub async fn get_or_compute<F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> CacheResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let role = {
            let mut state = self.state.lock();
            if let Some(value) = state.get_fresh(key, Instant::now()) {
                Role::Hit(value)
            } else if let Some(flight) = state.in_flight.get(key) {
                Role::Waiter(flight.done.clone())
            } else {
                state.next_flight += 1;
                let id = state.next_flight;
                let (tx, rx) = watch::channel(None);
                state
                    .in_flight
                    .insert(key.to_string(), InFlight { id, done: rx });
                Role::Leader(tx, id)
            }
        };

        match role {
            Role::Hit(value) => {
                debug!("Scan cache hit");
                Ok(value)
            }
            Role::Waiter(mut done) => {
                debug!("Joining in-flight computation");
                let outcome = match done.wait_for(Option::is_some).await {
                    Ok(outcome) => outcome.clone(),
                    Err(_) => None,
                };
                outcome.unwrap_or(Err(CacheError::Abandoned))
            }
            Role::Leader(tx, id) => {
                debug!("Scan cache miss, computing");
                let mut guard = FlightGuard {
                    state: Arc::clone(&self.state),
                    key: key.to_string(),
                    id,
                    armed: true,
                };

                let outcome = compute()
                    .await
                    .map_err(|e| CacheError::Computation(Arc::new(e)));

                {
                    let mut state = self.state.lock();
                    if let Ok(value) = &outcome {
                        if !ttl.is_zero() {
                            let expires_at = expiry(Instant::now(), ttl);
                            state.insert(key, value.clone(), expires_at, self.capacity);
                        }
                    }
                    state.clear_flight(key, id);
                }
                guard.armed = false;

                if let Err(err) = &outcome {
                    warn!(error = %err, "Scan computation failed; result not cached");
                }
                tx.send_replace(Some(outcome.clone()));
                outcome
            }
        }
    }
}

impl<V> std::fmt::Debug for ScanCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ScanCache")
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
