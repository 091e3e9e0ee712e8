//! Per-client request limiting backed by an expiring map.

use std::collections::hash_map::Entry as Slot;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::error::AppError;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

type Shared<K, V> = Arc<Mutex<HashMap<K, Entry<V>>>>;

/// Map whose entries expire a fixed time after insertion.
///
/// Expired entries are invisible to readers immediately and are removed by a
/// background sweep task. The task is owned by the map: it is spawned on
/// construction (when a Tokio runtime is available) and aborted on drop.
pub struct ExpiringMap<K, V> {
    entries: Shared<K, V>,
    ttl: Duration,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> ExpiringMap<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        let entries: Shared<K, V> = Arc::new(Mutex::new(HashMap::new()));
        let sweeper = tokio::runtime::Handle::try_current()
            .ok()
            .map(|handle| handle.spawn(sweep(Arc::downgrade(&entries), sweep_interval)));

        Self {
            entries,
            ttl,
            sweeper,
        }
    }

    /// Run `f` on the live value for `key`, inserting `init()` first if the key
    /// is absent or expired. `f` also receives the entry's remaining lifetime.
    pub fn with_entry<R>(
        &self,
        key: K,
        init: impl FnOnce() -> V,
        f: impl FnOnce(&mut V, Duration) -> R,
    ) -> R {
        let now = Instant::now();
        let mut entries = lock(&self.entries);

        let expires_at = now + self.ttl;
        let entry = match entries.entry(key) {
            Slot::Occupied(slot) if slot.get().expires_at > now => slot.into_mut(),
            Slot::Occupied(mut slot) => {
                slot.insert(Entry {
                    value: init(),
                    expires_at,
                });
                slot.into_mut()
            }
            Slot::Vacant(slot) => slot.insert(Entry {
                value: init(),
                expires_at,
            }),
        };

        f(&mut entry.value, entry.expires_at - now)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = Instant::now();
        lock(&self.entries)
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        lock(&self.entries).remove(key).map(|entry| entry.value)
    }

    /// Stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries)
    }
}

impl<K, V> Drop for ExpiringMap<K, V> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

fn lock<K, V>(entries: &Mutex<HashMap<K, Entry<V>>>) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

fn purge<K, V>(entries: &Mutex<HashMap<K, Entry<V>>>) -> usize {
    let now = Instant::now();
    let mut entries = lock(entries);
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
}

async fn sweep<K, V>(entries: Weak<Mutex<HashMap<K, Entry<V>>>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval.max(MIN_SWEEP_INTERVAL));
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(entries) = entries.upgrade() else {
            break;
        };
        let removed = purge(&entries);
        if removed > 0 {
            tracing::debug!(removed, "Swept expired rate limit windows");
        }
    }
}

/// Fixed-window request limiter keyed by client
pub struct RateLimiter {
    windows: ExpiringMap<String, u32>,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: ExpiringMap::new(window, window),
            max_requests,
        }
    }

    /// Count one request for `client`, failing once the window's budget is spent.
    pub fn check_rate_limit(&self, client: &str) -> Result<(), AppError> {
        let max_requests = self.max_requests;

        self.windows
            .with_entry(client.to_string(), || 0, |count, remaining| {
                if *count >= max_requests {
                    return Err(AppError::RateLimitExceeded {
                        retry_after_secs: ceil_secs(remaining),
                    });
                }
                *count += 1;
                Ok(())
            })
    }

    pub fn remaining_requests(&self, client: &str) -> u32 {
        let used = self.windows.get(&client.to_string()).unwrap_or(0);
        self.max_requests.saturating_sub(used)
    }

    pub fn reset_client(&self, client: &str) {
        self.windows.remove(&client.to_string());
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}
