//! Sensitive attribute value marker
//!
//! Attribute values such as password digests or tokens must never reach a
//! failure message or a log line. Wrapping them in [`Sensitive`] makes both
//! `Debug` and `Display` print [`REDACTED`].

use std::fmt;

/// Placeholder printed instead of a sensitive value
pub const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use recordx_core_types::Sensitive;
///
/// let digest = Sensitive::new("$2b$12$abc");
/// assert_eq!(format!("{}", digest), "***REDACTED***");
/// assert_eq!(digest.expose(), &"$2b$12$abc");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value (for comparison, never for rendering)
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: fmt::Display> Sensitive<T> {
    /// Render `value` as-is, or as [`REDACTED`] when `redact` is set
    pub fn render_if(redact: bool, value: T) -> String {
        if redact {
            Self::new(value).to_string()
        } else {
            value.to_string()
        }
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
