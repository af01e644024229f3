//! Identity type for notification handles.

use std::fmt;
use std::num::NonZeroU64;

/// Identifier of a registered notification.
///
/// Issued from a monotonically increasing generation counter and never
/// reused, so a token that outlives its notification can be told apart from
/// a token for a newer one. Zero is reserved for the null handle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(NonZeroU64);

impl HandleId {
    /// The first id a fresh registry hands out.
    pub const FIRST: HandleId = HandleId(NonZeroU64::MIN);

    /// Create a HandleId from its raw value. Returns `None` for zero.
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Get the raw value of this HandleId.
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// The id issued after this one, or `None` once the space is used up.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({})", self.0)
    }
}
