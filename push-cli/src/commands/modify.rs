//! Run a payload through the exported functions, host style.

use anyhow::{Context, Result};
use push_bridge::{
    modify_notification, notification_body, notification_destroy, notification_title,
    BridgeConfig, RustByteSlice,
};
use push_core::Identity;
use push_types::Notification;
use serde::Serialize;

/// What the host ends up displaying.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Modified {
    pub title: String,
    pub body: String,
}

/// Build a flat payload from `--title` and `--body`.
pub fn flat_payload(title: Option<String>, body: Option<String>) -> Result<Vec<u8>> {
    if title.is_none() && body.is_none() {
        anyhow::bail!("Must specify --payload or at least one of --title/--body");
    }
    let notification = Notification::new(title.unwrap_or_default(), body.unwrap_or_default());
    Ok(notification.to_json())
}

/// Run the modify command.
pub fn run(payload: &[u8], config: BridgeConfig) -> Result<()> {
    push_bridge::install(config, Identity).context("Failed to install bridge")?;

    let Some(modified) = modify_via_abi(payload) else {
        anyhow::bail!("Payload rejected; the notification would be shown unmodified");
    };

    println!("{}", serde_json::to_string_pretty(&modified)?);
    tracing::debug!(metrics = ?push_bridge::metrics(), "bridge counters");
    Ok(())
}

/// Construct, read both fields, destroy. `None` if construction failed.
pub fn modify_via_abi(payload: &[u8]) -> Option<Modified> {
    // SAFETY: the view borrows `payload`, which outlives the call.
    let handle = unsafe { modify_notification(RustByteSlice::from_bytes(payload)) };
    if handle.is_null() {
        return None;
    }

    let modified = Modified {
        title: copy_out(notification_title(handle)),
        body: copy_out(notification_body(handle)),
    };
    notification_destroy(handle);
    Some(modified)
}

fn copy_out(view: RustByteSlice) -> String {
    // SAFETY: the view came from a live handle that has not been destroyed.
    match unsafe { view.as_bytes() } {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_payload_from_flags() {
        let payload = flat_payload(Some("Hello".into()), None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["body"], "");
    }

    #[test]
    fn flat_payload_needs_a_field() {
        assert!(flat_payload(None, None).is_err());
    }

    #[test]
    fn modify_round_trip() {
        let payload = flat_payload(Some("Hello".into()), Some("World".into())).unwrap();
        assert_eq!(
            modify_via_abi(&payload),
            Some(Modified {
                title: "Hello".to_string(),
                body: "World".to_string(),
            })
        );
    }

    #[test]
    fn modify_rejects_garbage() {
        assert_eq!(modify_via_abi(b"not json"), None);
    }
}
