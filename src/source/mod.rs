//! Global keystroke / mouse capture, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread** — it cannot be
//! used inside a tokio task.  [`RdevEventSource::start`] spawns that thread;
//! the callback hands events to the coordinator with a bounded, non-blocking
//! `try_send` so the real-time-sensitive capture path never stalls.
//!
//! The [`EventSource`] trait is the seam the orchestrator uses to pause
//! capture around programmatic edits — without it, the system would observe
//! its own correction as fresh user input and re-trigger the pipeline.
//!
//! Input capture requires elevated permission on most platforms; the failure
//! is reported (logged), not negotiated, by this layer.

pub mod rdev_source;

pub use rdev_source::RdevEventSource;

// ---------------------------------------------------------------------------
// EventSource
// ---------------------------------------------------------------------------

/// Control surface of the capture layer.
pub trait EventSource: Send + Sync {
    /// Suppress event delivery (capture keeps running, events are dropped).
    fn pause(&self);

    /// Resume event delivery.
    fn resume(&self);

    /// Stop delivering events permanently.
    fn stop(&self);
}

/// Event source that ignores all control calls — for tests and for
/// orchestrators wired to a replayed event stream.
pub struct NoopEventSource;

impl EventSource for NoopEventSource {
    fn pause(&self) {}
    fn resume(&self) {}
    fn stop(&self) {}
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a trigger-key name from a config string into an [`rdev::Key`].
///
/// Supports F1–F12 and a few named keys.  Returns `None` for unrecognised
/// names so callers can fall back to a default.
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    match key_str {
        "F1" => Some(rdev::Key::F1),
        "F2" => Some(rdev::Key::F2),
        "F3" => Some(rdev::Key::F3),
        "F4" => Some(rdev::Key::F4),
        "F5" => Some(rdev::Key::F5),
        "F6" => Some(rdev::Key::F6),
        "F7" => Some(rdev::Key::F7),
        "F8" => Some(rdev::Key::F8),
        "F9" => Some(rdev::Key::F9),
        "F10" => Some(rdev::Key::F10),
        "F11" => Some(rdev::Key::F11),
        "F12" => Some(rdev::Key::F12),
        "Escape" | "Esc" => Some(rdev::Key::Escape),
        "Home" => Some(rdev::Key::Home),
        "End" => Some(rdev::Key::End),
        "PageUp" => Some(rdev::Key::PageUp),
        "PageDown" => Some(rdev::Key::PageDown),
        _ => None,
    }
}
