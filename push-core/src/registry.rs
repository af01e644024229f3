//! Liveness registry for notification handles.
//!
//! Every handle given to the host is a [`HandleId`] key into this registry.
//! Ids come from a generation counter that only moves forward, so once a
//! handle is destroyed its id is never issued again. That lets a lookup
//! distinguish three cases without ever touching freed memory:
//!
//! - live: the id is in the map
//! - stale: the id is below the counter but gone from the map (destroyed)
//! - unknown: the id was never issued
//!
//! Stored notifications are immutable and shared through `Arc`, so any
//! number of threads may read the same handle concurrently. Byte views into
//! a stored notification stay valid until [`HandleRegistry::remove`] drops
//! the registry's reference.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use push_types::{HandleId, Notification};
use thiserror::Error;

/// Default cap on simultaneously live handles.
pub const DEFAULT_MAX_LIVE_HANDLES: usize = 1024;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Too many handles are live.
    #[error("registry full ({capacity} live handles)")]
    Full {
        /// Configured live-handle limit.
        capacity: usize,
    },

    /// The generation counter ran out of ids.
    #[error("handle id space exhausted")]
    Exhausted,

    /// The handle was issued and has since been destroyed.
    #[error("stale handle {0}: already destroyed")]
    Stale(HandleId),

    /// The handle was never issued by this registry.
    #[error("unknown handle {0}")]
    Unknown(HandleId),
}

/// Concurrent map from handle id to its notification.
#[derive(Debug)]
pub struct HandleRegistry {
    entries: DashMap<HandleId, Arc<Notification>>,
    /// Raw value of the next id to issue.
    next: AtomicU64,
    /// Live entries plus in-flight reservations.
    live: AtomicUsize,
    capacity: usize,
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LIVE_HANDLES)
    }
}

impl HandleRegistry {
    /// Create an empty registry that holds at most `capacity` live handles.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            next: AtomicU64::new(HandleId::FIRST.get()),
            live: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Register a notification and return its fresh id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Full`] when `capacity` handles are already live,
    /// [`RegistryError::Exhausted`] when no unused id is left.
    pub fn insert(&self, notification: Notification) -> Result<HandleId, RegistryError> {
        let capacity = self.capacity;
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < capacity).then_some(live + 1)
            })
            .map_err(|_| RegistryError::Full { capacity })?;

        let issued = self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                HandleId::from_raw(raw)
                    .and_then(|id| id.next())
                    .map(|next| next.get())
            })
            .ok()
            .and_then(HandleId::from_raw);

        let Some(id) = issued else {
            self.live.fetch_sub(1, Ordering::AcqRel);
            return Err(RegistryError::Exhausted);
        };

        self.entries.insert(id, Arc::new(notification));
        Ok(id)
    }

    /// Look up a live notification.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Stale`] or [`RegistryError::Unknown`] if `id` is not live.
    pub fn get(&self, id: HandleId) -> Result<Arc<Notification>, RegistryError> {
        self.entries
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| self.classify_missing(id))
    }

    /// Remove a live notification, ending its handle's lifetime.
    ///
    /// Succeeds at most once per id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Stale`] or [`RegistryError::Unknown`] if `id` is not live.
    pub fn remove(&self, id: HandleId) -> Result<Arc<Notification>, RegistryError> {
        match self.entries.remove(&id) {
            Some((_, notification)) => {
                self.live.fetch_sub(1, Ordering::AcqRel);
                Ok(notification)
            }
            None => Err(self.classify_missing(id)),
        }
    }

    /// True if `id` is live.
    pub fn contains(&self, id: HandleId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no handle is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of live handles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn classify_missing(&self, id: HandleId) -> RegistryError {
        if id.get() < self.next.load(Ordering::Acquire) {
            RegistryError::Stale(id)
        } else {
            RegistryError::Unknown(id)
        }
    }

    #[cfg(test)]
    fn starting_at(capacity: usize, next: u64) -> Self {
        let registry = Self::new(capacity);
        registry.next.store(next, Ordering::Release);
        registry
    }
}
