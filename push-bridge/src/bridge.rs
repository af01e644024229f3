//! The bridge state behind the exported functions.
//!
//! A [`Bridge`] owns the modifier, the handle registry and the counters.
//! The exported C functions all go through one process-wide instance,
//! configured either by [`install`] or lazily from `PUSHMOD_CONFIG` on the
//! first call.

use std::sync::atomic::Ordering;
use std::sync::{Arc, OnceLock};

use push_core::{Chain, HandleRegistry, Identity, Modifier, RegistryError, Transform};
use push_types::{HandleId, Notification};
use tracing::{debug, error, info, warn};

use crate::config::{BridgeConfig, MisusePolicy};
use crate::error::BridgeError;
use crate::logging;
use crate::metrics::{BridgeMetrics, MetricsSnapshot};

static BRIDGE: OnceLock<Bridge> = OnceLock::new();

/// Modifier, registry and counters for one set of handles.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    modifier: Modifier,
    registry: HandleRegistry,
    metrics: BridgeMetrics,
}

impl Bridge {
    /// Create a bridge running `transform`, followed by any truncation the
    /// config asks for.
    pub fn new(config: BridgeConfig, transform: impl Transform + 'static) -> Self {
        Self::boxed(config, Box::new(transform))
    }

    /// Create a bridge that leaves notifications as decoded, apart from
    /// config-driven truncation.
    pub fn with_defaults(config: BridgeConfig) -> Self {
        Self::new(config, Identity)
    }

    fn boxed(config: BridgeConfig, transform: Box<dyn Transform>) -> Self {
        let transform: Box<dyn Transform> = match config.transform.truncate() {
            Some(truncate) => Box::new(Chain::new().then_boxed(transform).then(truncate)),
            None => transform,
        };
        let modifier = Modifier::boxed(transform).with_max_payload_bytes(config.payload.max_bytes);
        let registry = HandleRegistry::new(config.registry.max_live_handles);

        Self {
            config,
            modifier,
            registry,
            metrics: BridgeMetrics::default(),
        }
    }

    /// Decode, transform and register a payload.
    ///
    /// Failures are logged and counted here.
    pub fn construct(&self, payload: &[u8]) -> Result<HandleId, BridgeError> {
        match self.try_construct(payload) {
            Ok(id) => {
                self.metrics.constructed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    handle = %id,
                    transform = self.modifier.transform_name(),
                    "notification constructed"
                );
                Ok(id)
            }
            Err(e) => {
                self.note_construction_failure(&e);
                Err(e)
            }
        }
    }

    fn try_construct(&self, payload: &[u8]) -> Result<HandleId, BridgeError> {
        let notification = self.modifier.modify(payload)?;
        let id = self.registry.insert(notification)?;

        // The id travels as a pointer-sized token.
        if usize::try_from(id.get()).is_err() {
            let _ = self.registry.remove(id);
            return Err(RegistryError::Exhausted.into());
        }
        Ok(id)
    }

    pub(crate) fn note_construction_failure(&self, err: &BridgeError) {
        self.metrics
            .construction_failures
            .fetch_add(1, Ordering::Relaxed);
        warn!(error = %err, "notification construction failed");
    }

    /// The live notification behind `id`.
    pub fn notification(&self, id: HandleId) -> Result<Arc<Notification>, BridgeError> {
        Ok(self.registry.get(id)?)
    }

    /// End the lifetime of `id`. Succeeds at most once per id.
    pub fn destroy(&self, id: HandleId) -> Result<(), BridgeError> {
        self.registry.remove(id)?;
        self.metrics.destroyed.fetch_add(1, Ordering::Relaxed);
        debug!(handle = %id, "notification destroyed");
        Ok(())
    }

    /// Handle a failed accessor or destroy call.
    ///
    /// A broken handle contract is logged and counted, then the misuse
    /// policy applies. Anything else is only logged.
    pub(crate) fn report_handle_error(&self, op: &'static str, err: &BridgeError) {
        if !err.is_invalid_handle_use() {
            error!(op, error = %err, "handle operation failed");
            return;
        }

        self.metrics
            .invalid_handle_uses
            .fetch_add(1, Ordering::Relaxed);
        error!(op, error = %err, "invalid handle use");

        if self.config.misuse.policy == MisusePolicy::Abort {
            std::process::abort();
        }
    }

    /// Current counters and live handle count.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.registry.len())
    }

    /// Configuration this bridge was built from.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Most handles this bridge keeps alive at once.
    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    fn log_settings(&self, message: &str) {
        let config = self.config();
        info!(
            transform = self.modifier.transform_name(),
            policy = ?config.misuse.policy,
            max_payload_bytes = config.payload.max_bytes,
            max_live_handles = self.capacity(),
            "{}",
            message
        );
    }
}

/// Configure the process-wide bridge before the first exported call.
///
/// # Errors
///
/// [`BridgeError::Config`] if `config` does not validate,
/// [`BridgeError::AlreadyInstalled`] if the bridge is already in use.
pub fn install(config: BridgeConfig, transform: impl Transform + 'static) -> Result<(), BridgeError> {
    config.validate()?;
    let logging = config.logging.clone();

    BRIDGE
        .set(Bridge::new(config, transform))
        .map_err(|_| BridgeError::AlreadyInstalled)?;

    logging::init(&logging);
    if let Some(bridge) = BRIDGE.get() {
        bridge.log_settings("bridge installed");
    }
    Ok(())
}

/// The process-wide bridge, initialized from the environment if needed.
pub(crate) fn global() -> &'static Bridge {
    BRIDGE.get_or_init(|| {
        let (config, load_error) = match BridgeConfig::from_env() {
            Ok(config) => (config, None),
            Err(e) => (BridgeConfig::default(), Some(e)),
        };

        logging::init(&config.logging);
        if let Some(e) = load_error {
            error!(error = %e, "failed to load bridge config, using defaults");
        }
        let bridge = Bridge::with_defaults(config);
        bridge.log_settings("bridge initialized from environment");
        bridge
    })
}

/// Snapshot of the process-wide bridge's counters.
pub fn metrics() -> MetricsSnapshot {
    global().metrics()
}
