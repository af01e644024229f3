//! Title/body transformation strategies.
//!
//! What a notification should look like once rewritten is product logic, so
//! the bridge only knows the [`Transform`] trait. Closures work directly:
//!
//! ```
//! use pushmod_core::{Transform, TransformError};
//! use push_types::Notification;
//!
//! let shout = |mut n: Notification| -> Result<Notification, TransformError> {
//!     n.title = n.title.to_uppercase();
//!     Ok(n)
//! };
//! let n = shout.apply(Notification::new("hello", "world")).unwrap();
//! assert_eq!(n.title, "HELLO");
//! ```

use push_types::Notification;
use thiserror::Error;

/// Errors a transform can report. Both end in a null handle at the ABI.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The notification should not be shown in rewritten form.
    #[error("notification rejected: {0}")]
    Rejected(String),

    /// The transform could not finish.
    #[error("transform failed: {0}")]
    Failed(String),
}

/// A rewrite applied to every decoded notification before it is registered.
pub trait Transform: Send + Sync {
    /// Rewrite `notification`.
    fn apply(&self, notification: Notification) -> Result<Notification, TransformError>;

    /// Name used in log events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Transform for F
where
    F: Fn(Notification) -> Result<Notification, TransformError> + Send + Sync,
{
    fn apply(&self, notification: Notification) -> Result<Notification, TransformError> {
        self(notification)
    }
}

/// Leaves the notification as it arrived.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, notification: Notification) -> Result<Notification, TransformError> {
        Ok(notification)
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Caps title and body length in characters, marking cuts with an ellipsis.
///
/// Cuts always land on a `char` boundary so the result stays valid UTF-8.
#[derive(Debug, Clone)]
pub struct Truncate {
    max_title_chars: Option<usize>,
    max_body_chars: Option<usize>,
    ellipsis: String,
}

impl Truncate {
    /// Create a truncation with optional limits and the default `…` marker.
    pub fn new(max_title_chars: Option<usize>, max_body_chars: Option<usize>) -> Self {
        Self {
            max_title_chars,
            max_body_chars,
            ellipsis: "\u{2026}".to_string(),
        }
    }

    /// Use a different cut marker.
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    fn cut(&self, text: String, max_chars: Option<usize>) -> String {
        let Some(max) = max_chars else {
            return text;
        };
        if text.chars().count() <= max {
            return text;
        }

        let marker_chars = self.ellipsis.chars().count();
        if marker_chars >= max {
            return text.chars().take(max).collect();
        }

        let keep = max - marker_chars;
        let end = text
            .char_indices()
            .nth(keep)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        let mut out = String::with_capacity(end + self.ellipsis.len());
        out.push_str(text[..end].trim_end());
        out.push_str(&self.ellipsis);
        out
    }
}

impl Transform for Truncate {
    fn apply(&self, mut notification: Notification) -> Result<Notification, TransformError> {
        notification.title = self.cut(notification.title, self.max_title_chars);
        notification.body = self.cut(notification.body, self.max_body_chars);
        Ok(notification)
    }

    fn name(&self) -> &str {
        "truncate"
    }
}

/// Runs transforms in order, stopping at the first error.
#[derive(Default)]
pub struct Chain {
    steps: Vec<Box<dyn Transform>>,
}

impl Chain {
    /// Create an empty chain (behaves like [`Identity`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn then(self, step: impl Transform + 'static) -> Self {
        self.then_boxed(Box::new(step))
    }

    /// Append an already boxed step.
    pub fn then_boxed(mut self, step: Box<dyn Transform>) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.name()))
            .finish()
    }
}

impl Transform for Chain {
    fn apply(&self, notification: Notification) -> Result<Notification, TransformError> {
        self.steps
            .iter()
            .try_fold(notification, |n, step| step.apply(n))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_changes_nothing() {
        let n = Notification::new("Hello", "World");
        assert_eq!(Identity.apply(n.clone()).unwrap(), n);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        let t = Truncate::new(Some(10), Some(10));
        let n = t.apply(Notification::new("Hello", "World")).unwrap();
        assert_eq!(n.title, "Hello");
        assert_eq!(n.body, "World");
    }

    #[test]
    fn truncate_cuts_with_ellipsis() {
        let t = Truncate::new(Some(8), None);
        let n = t
            .apply(Notification::new("Meeting moved to Friday", "unchanged"))
            .unwrap();
        assert_eq!(n.title, "Meeting\u{2026}");
        assert_eq!(n.title.chars().count(), 8);
        assert_eq!(n.body, "unchanged");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let t = Truncate::new(None, Some(4)).with_ellipsis("..");
        let n = t.apply(Notification::new("", "日本語のテキスト")).unwrap();
        assert_eq!(n.body, "日本..");
    }

    #[test]
    fn truncate_with_marker_longer_than_limit() {
        let t = Truncate::new(Some(2), None).with_ellipsis("...");
        let n = t.apply(Notification::new("abcdef", "")).unwrap();
        assert_eq!(n.title, "ab");
    }

    #[test]
    fn closures_are_transforms() {
        let prefix = |mut n: Notification| -> Result<Notification, TransformError> {
            n.title = format!("[gather] {}", n.title);
            Ok(n)
        };
        let n = prefix.apply(Notification::new("Hello", "World")).unwrap();
        assert_eq!(n.title, "[gather] Hello");
    }

    #[test]
    fn chain_runs_in_order() {
        let chain = Chain::new()
            .then(|mut n: Notification| -> Result<Notification, TransformError> {
                n.title.push_str(" world, how are you");
                Ok(n)
            })
            .then(Truncate::new(Some(12), None).with_ellipsis("!"));
        assert_eq!(chain.len(), 2);

        let n = chain.apply(Notification::new("hello", "")).unwrap();
        assert_eq!(n.title, "hello world!");
    }

    #[test]
    fn chain_stops_at_first_error() {
        let chain = Chain::new()
            .then(|_: Notification| -> Result<Notification, TransformError> {
                Err(TransformError::Rejected("muted thread".to_string()))
            })
            .then(|_: Notification| -> Result<Notification, TransformError> {
                panic!("must not run")
            });
        let err = chain.apply(Notification::default()).unwrap_err();
        assert!(matches!(err, TransformError::Rejected(_)));
        assert_eq!(err.to_string(), "notification rejected: muted thread");
    }

    #[test]
    fn empty_chain_is_identity() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        let n = Notification::new("a", "b");
        assert_eq!(chain.apply(n.clone()).unwrap(), n);
    }
}
