//! Operational counters for the bridge.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated on every ABI call.
///
/// All counters are monotonically increasing (reset only on restart).
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Handles successfully constructed.
    pub constructed: AtomicU64,
    /// Constructions that returned a null handle.
    pub construction_failures: AtomicU64,
    /// Handles destroyed.
    pub destroyed: AtomicU64,
    /// Stale or unknown handles passed to an accessor or destroy.
    pub invalid_handle_uses: AtomicU64,
}

/// A point-in-time copy of [`BridgeMetrics`] plus the live handle count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Handles successfully constructed.
    pub constructed: u64,
    /// Constructions that returned a null handle.
    pub construction_failures: u64,
    /// Handles destroyed.
    pub destroyed: u64,
    /// Stale or unknown handles passed to an accessor or destroy.
    pub invalid_handle_uses: u64,
    /// Handles currently live.
    pub live: usize,
}

impl BridgeMetrics {
    /// Copy the counters.
    pub fn snapshot(&self, live: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            constructed: self.constructed.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            invalid_handle_uses: self.invalid_handle_uses.load(Ordering::Relaxed),
            live,
        }
    }
}
