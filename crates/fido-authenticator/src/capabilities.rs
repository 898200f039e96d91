//! External capability interfaces a host embeds this crate against.
//!
//! `spec.md` names user-presence prompting a Non-goal (no UI is provided)
//! and excludes USB-HID transport framing, but still leaves "ask the user"
//! and "keep the transport alive during a long-running operation" as seams
//! an embedder must supply. These traits are that seam.
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceOutcome {
    Confirmed,
    Denied,
    TimedOut,
}

/// Obtains user presence (and, where supported, user verification) for an
/// operation that requires it.
pub trait UserPresence: Send + Sync {
    fn prompt(&self, timeout: Duration) -> PresenceOutcome;
}

/// Signals liveness to the host transport during a long-running operation,
/// analogous to `CTAPHIDKeepAlive` in the original source, without
/// depending on any particular transport framing.
pub trait KeepAlive: Send + Sync {
    fn ping(&self);
}

/// A [`UserPresence`] that always confirms immediately, and a [`KeepAlive`]
/// that does nothing — useful for tests and for embedders that enforce
/// presence out of process.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPresent;

impl UserPresence for AlwaysPresent {
    fn prompt(&self, _timeout: Duration) -> PresenceOutcome {
        PresenceOutcome::Confirmed
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopKeepAlive;

impl KeepAlive for NoopKeepAlive {
    fn ping(&self) {}
}
