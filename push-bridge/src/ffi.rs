//! The exported C functions.
//!
//! A `push_notification *` is a [`HandleId`] carried as a pointer-sized
//! integer. It is never dereferenced, so stale and forged handles are
//! caught by the registry lookup instead of reading freed memory.
//!
//! Panics are caught at each entry point and turned into the failure
//! value of that function.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use push_types::{HandleId, Notification};
use tracing::{debug, error};

use crate::bridge::global;
use crate::error::BridgeError;
use crate::slice::RustByteSlice;

/// Opaque notification handle as seen from C.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct push_notification {
    _private: [u8; 0],
}

fn to_token(id: HandleId) -> *mut push_notification {
    // `Bridge::construct` only issues ids that fit in a usize.
    id.get() as usize as *mut push_notification
}

fn from_token(handle: *const push_notification) -> Option<HandleId> {
    HandleId::from_raw(handle as usize as u64)
}

fn guard<T>(op: &'static str, fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(op, "{}", BridgeError::Panicked(op));
        fallback
    })
}

fn title(notification: &Notification) -> &str {
    &notification.title
}

fn body(notification: &Notification) -> &str {
    &notification.body
}

fn read_field(
    op: &'static str,
    handle: *const push_notification,
    field: fn(&Notification) -> &str,
) -> RustByteSlice {
    guard(op, RustByteSlice::empty(), || {
        let Some(id) = from_token(handle) else {
            debug!(op, "{}, returning empty view", BridgeError::NullHandle);
            return RustByteSlice::empty();
        };

        let bridge = global();
        match bridge.notification(id) {
            // The registry keeps the notification alive until destroy, so
            // the view outlives this `Arc`.
            Ok(notification) => RustByteSlice::from_bytes(field(&notification).as_bytes()),
            Err(e) => {
                bridge.report_handle_error(op, &e);
                RustByteSlice::empty()
            }
        }
    })
}

/// Decode a raw push payload, run it through the installed transform and
/// return a handle to the result.
///
/// Returns null if the payload is malformed, the transform rejects it, or
/// the bridge is at its live-handle limit. A non-null result must be passed
/// to [`notification_destroy`] exactly once.
///
/// # Safety
///
/// If `payload.len > 0`, `payload.bytes` must point to `payload.len`
/// readable bytes for the duration of the call. The bytes are not retained.
#[no_mangle]
pub unsafe extern "C" fn modify_notification(payload: RustByteSlice) -> *mut push_notification {
    guard("modify_notification", ptr::null_mut(), || {
        let bridge = global();

        // SAFETY: the caller upholds the contract documented above.
        let Some(bytes) = (unsafe { payload.as_bytes() }) else {
            bridge.note_construction_failure(&BridgeError::NullSlice);
            return ptr::null_mut();
        };

        match bridge.construct(bytes) {
            Ok(id) => to_token(id),
            Err(_) => ptr::null_mut(),
        }
    })
}

/// The title of a live notification, valid until the handle is destroyed.
///
/// A null handle yields the empty view.
#[no_mangle]
pub extern "C" fn notification_title(handle: *const push_notification) -> RustByteSlice {
    read_field("notification_title", handle, title)
}

/// The body of a live notification, valid until the handle is destroyed.
///
/// A null handle yields the empty view.
#[no_mangle]
pub extern "C" fn notification_body(handle: *const push_notification) -> RustByteSlice {
    read_field("notification_body", handle, body)
}

/// Release a notification. Null is a no-op.
///
/// Destroying the same handle twice is a programming error: it is logged
/// and then handled per `[misuse] policy`.
#[no_mangle]
pub extern "C" fn notification_destroy(handle: *mut push_notification) {
    guard("notification_destroy", (), || {
        let Some(id) = from_token(handle) else {
            return;
        };

        let bridge = global();
        if let Err(e) = bridge.destroy(id) {
            bridge.report_handle_error("notification_destroy", &e);
        }
    })
}
