//! The byte-slice view passed across the C ABI in both directions.

use std::ptr;

/// A non-owning `(pointer, length)` view of bytes. Not NUL-terminated.
///
/// Layout matches the C declaration
/// `typedef struct { const uint8_t *bytes; size_t len; } RustByteSlice;`.
///
/// Views the bridge returns point into a live handle and stay valid until
/// that handle is destroyed. The host copies out whatever it keeps.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RustByteSlice {
    /// First byte; null only when `len == 0`.
    pub bytes: *const u8,
    /// Number of bytes.
    pub len: usize,
}

impl RustByteSlice {
    /// The zero-length view (`bytes` is null).
    pub const fn empty() -> Self {
        Self {
            bytes: ptr::null(),
            len: 0,
        }
    }

    /// View `bytes` without taking ownership.
    ///
    /// The view carries no lifetime; the caller keeps `bytes` alive for as
    /// long as the view is handed out. Empty input yields [`Self::empty`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::empty();
        }
        Self {
            bytes: bytes.as_ptr(),
            len: bytes.len(),
        }
    }

    /// True if the view has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the viewed bytes.
    ///
    /// Returns `None` for the malformed case of a null pointer with a
    /// non-zero length.
    ///
    /// # Safety
    ///
    /// When `len > 0` and `bytes` is non-null, `bytes[0..len)` must be
    /// initialized, readable, and unmodified for the lifetime `'a`.
    pub unsafe fn as_bytes<'a>(&self) -> Option<&'a [u8]> {
        if self.len == 0 {
            return Some(&[]);
        }
        if self.bytes.is_null() {
            return None;
        }
        // SAFETY: non-null, and the caller guarantees `len` readable bytes.
        Some(unsafe { std::slice::from_raw_parts(self.bytes, self.len) })
    }
}

impl Default for RustByteSlice {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_null_and_zero() {
        let s = RustByteSlice::empty();
        assert!(s.bytes.is_null());
        assert_eq!(s.len, 0);
        assert!(s.is_empty());
        assert!(RustByteSlice::default().bytes.is_null());
    }

    #[test]
    fn from_bytes_views_without_copying() {
        let data = b"Hello".to_vec();
        let s = RustByteSlice::from_bytes(&data);
        assert_eq!(s.bytes, data.as_ptr());
        assert_eq!(s.len, 5);
        assert_eq!(unsafe { s.as_bytes() }, Some(&b"Hello"[..]));
    }

    #[test]
    fn from_empty_bytes_is_null() {
        let s = RustByteSlice::from_bytes(b"");
        assert!(s.bytes.is_null());
    }

    #[test]
    fn null_with_zero_len_is_empty_input() {
        let s = RustByteSlice {
            bytes: ptr::null(),
            len: 0,
        };
        assert_eq!(unsafe { s.as_bytes() }, Some(&[][..]));
    }

    #[test]
    fn null_with_len_is_rejected() {
        let s = RustByteSlice {
            bytes: ptr::null(),
            len: 12,
        };
        assert_eq!(unsafe { s.as_bytes() }, None);
    }

    #[test]
    fn layout_is_two_words() {
        assert_eq!(
            std::mem::size_of::<RustByteSlice>(),
            2 * std::mem::size_of::<usize>()
        );
        assert_eq!(
            std::mem::align_of::<RustByteSlice>(),
            std::mem::align_of::<usize>()
        );
    }
}
