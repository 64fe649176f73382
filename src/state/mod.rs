//! Shared tab store for the Tabkit toolkit
//!
//! Every tab group on a page records its last-chosen tab in one
//! process-wide key-value store, so groups that opt into the same key stay
//! in sync and the choice survives in-app navigation. The store provides:
//!
//! 1. `TabStore` - a reactive string-to-string map with per-key subscriber
//!    lists, notified synchronously on write
//! 2. `Subscription` - a handle that removes its subscriber when dropped
//! 3. JSON snapshots so a host can persist the map for the session

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, OnceLock, Weak,
    },
};

// Define type aliases for the subscriber plumbing
type SubscriberCallback = Arc<dyn Fn(&str) + Send + Sync>;
type SubscriberMap = HashMap<String, Vec<(u64, SubscriberCallback)>>;

static SHARED_STORE: OnceLock<TabStore> = OnceLock::new();

/// Process-wide reactive key-value store for tab selections
///
/// Cloning a `TabStore` shares the underlying map. Entries are overwritten,
/// never deleted, and no group owns a key exclusively; the consistency
/// model between groups is last-write-wins.
#[derive(Clone)]
pub struct TabStore {
    // Using Arc<Mutex<>> for thread-safe interior mutability
    values: Arc<Mutex<HashMap<String, String>>>,
    // Subscribers are notified with the new value after a key changes
    subscribers: Arc<Mutex<SubscriberMap>>,
    // Monotonic id source for subscriptions
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for TabStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStore")
            .field("values", &"[ValueMap]")
            .field("subscribers", &"[SubscriberMap]")
            .finish()
    }
}

impl TabStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the store shared by every group in this process
    ///
    /// Created on first use and never torn down; this is the store
    /// [`crate::component::Context::new`] hands to widgets.
    pub fn shared() -> Self {
        SHARED_STORE.get_or_init(TabStore::new).clone()
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    /// Store `value` under `key`, overwriting any previous entry
    ///
    /// Subscribers of `key` are notified synchronously, and only when the
    /// stored value actually changed.
    pub fn insert(&self, key: &str, value: &str) {
        let changed = if let Ok(mut values) = self.values.lock() {
            match values.insert(key.to_string(), value.to_string()) {
                Some(previous) => previous != value,
                None => true,
            }
        } else {
            false
        };

        if changed {
            self.notify(key, value);
        }
    }

    /// Subscribe to changes of `key`
    ///
    /// The callback receives the new value. Dropping the returned
    /// [`Subscription`] removes the subscriber; a group instance must hold
    /// its subscription for exactly as long as it is mounted.
    pub fn subscribe(
        &self,
        key: &str,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers
                .entry(key.to_string())
                .or_default()
                .push((id, Arc::new(callback)));
        }

        Subscription {
            subscribers: Arc::downgrade(&self.subscribers),
            key: key.to_string(),
            id,
        }
    }

    /// Serialize the current entries as JSON
    pub fn snapshot(&self) -> Result<String, crate::Error> {
        let values = self
            .values
            .lock()
            .map_err(|e| crate::Error::Store(format!("Failed to lock store values: {}", e)))?;

        serde_json::to_string(&*values).map_err(|e| crate::Error::Store(e.to_string()))
    }

    /// Merge entries from a JSON snapshot produced by [`TabStore::snapshot`]
    ///
    /// Existing entries under other keys are kept; subscribers of keys whose
    /// value changes are notified as for [`TabStore::insert`].
    pub fn restore(&self, snapshot: &str) -> Result<(), crate::Error> {
        let entries: HashMap<String, String> =
            serde_json::from_str(snapshot).map_err(|e| crate::Error::Store(e.to_string()))?;

        for (key, value) in &entries {
            self.insert(key, value);
        }
        Ok(())
    }

    /// Notify subscribers of a change to `key`
    fn notify(&self, key: &str, value: &str) {
        // Clone the callbacks out so no lock is held while they run; a
        // callback is free to read or write the store again.
        let callbacks: Vec<SubscriberCallback> = match self.subscribers.lock() {
            Ok(subscribers) => subscribers
                .get(key)
                .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };

        for callback in callbacks {
            callback(value);
        }
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for a store subscription; dropping it removes the subscriber
pub struct Subscription {
    subscribers: Weak<Mutex<SubscriberMap>>,
    key: String,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(subscribers) = self.subscribers.upgrade() else {
            return;
        };

        let lock_result = subscribers.lock();
        if let Ok(mut subscribers) = lock_result {
            if let Some(list) = subscribers.get_mut(&self.key) {
                list.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
