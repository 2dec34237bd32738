//! Keyed one-shot timers on the tokio runtime.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::AbortHandle;

struct Armed {
    generation: u64,
    handle: AbortHandle,
}

/// At most one pending timer per key. Arming a key again aborts the old timer.
pub struct TimerRegistry<K> {
    timers: Arc<Mutex<HashMap<K, Armed>>>,
    generation: Arc<AtomicU64>,
}

impl<K> Clone for TimerRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            timers: Arc::clone(&self.timers),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<K> Default for TimerRegistry<K> {
    fn default() -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<K> TimerRegistry<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` has elapsed. Replaces any timer pending under `key`.
    pub fn arm<F, Fut>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let own_key = key.clone();

        let Ok(mut map) = self.timers.lock() else {
            tracing::error!("Timer registry lock poisoned; timer not armed");
            return;
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Leave the map before running so the action may re-arm its own key.
            if let Ok(mut map) = timers.lock() {
                if map.get(&own_key).is_some_and(|a| a.generation == generation) {
                    map.remove(&own_key);
                }
            }
            action().await;
        })
        .abort_handle();

        if let Some(previous) = map.insert(key, Armed { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// Abort the timer under `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        let removed = self.timers.lock().ok().and_then(|mut map| map.remove(key));
        match removed {
            Some(armed) => {
                armed.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.timers
            .lock()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Abort everything.
    pub fn clear(&self) {
        if let Ok(mut map) = self.timers.lock() {
            for (_, armed) in map.drain() {
                armed.handle.abort();
            }
        }
    }
}
