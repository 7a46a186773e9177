//! Optional SDK availability.
//!
//! The probe's result is carried two ways:
//!
//! - as an owned [`Availability`] value handed to whatever needs it (the
//!   runtime handoff, feature gates), and
//! - as a process-wide, write-once flag behind [`is_available`] for code that
//!   has no way to receive it.
//!
//! ## Usage
//!
//! ```ignore
//! // At startup:
//! let report = ctx.ensure_probe();
//! availability::publish(report.availability);
//!
//! // Anywhere else:
//! if availability::is_available() {
//!     register_for_push();
//! }
//! ```

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

/// Whether the optional SDK came up during startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Availability(bool);

impl Availability {
    pub const AVAILABLE: Self = Self(true);
    pub const UNAVAILABLE: Self = Self(false);

    pub const fn new(available: bool) -> Self {
        Self(available)
    }

    pub const fn is_available(self) -> bool {
        self.0
    }
}

impl From<bool> for Availability {
    fn from(available: bool) -> Self {
        Self(available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-wide availability, written once by the startup sequence.
static AVAILABILITY: OnceLock<Availability> = OnceLock::new();

/// Publish the startup result.
///
/// Only the first call has any effect. Returns `false` if a value was
/// already published.
pub fn publish(availability: Availability) -> bool {
    if AVAILABILITY.set(availability).is_err() {
        tracing::warn!(
            "Attempting to publish SDK availability when it is already set. Keeping existing."
        );
        return false;
    }
    true
}

/// Whether the optional SDK is usable. `false` until startup publishes.
pub fn is_available() -> bool {
    current().is_available()
}

/// The published availability, or the default before startup.
pub fn current() -> Availability {
    AVAILABILITY.get().copied().unwrap_or_default()
}

/// Check if startup has published a value yet.
pub fn has_published() -> bool {
    AVAILABILITY.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unavailable() {
        assert_eq!(Availability::default(), Availability::UNAVAILABLE);
        assert!(!Availability::default().is_available());
    }

    #[test]
    fn test_display_is_js_literal() {
        assert_eq!(Availability::AVAILABLE.to_string(), "true");
        assert_eq!(Availability::from(false).to_string(), "false");
    }

    #[test]
    fn test_serializes_as_bool() {
        assert_eq!(serde_json::to_string(&Availability::AVAILABLE).unwrap(), "true");
    }
}
