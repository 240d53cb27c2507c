//! Typing-pause detection.
//!
//! A debounce timer driven by segmenter activity: every
//! [`PauseDetector::notify_activity`] re-arms a one-shot timer; if the timer
//! fires without being superseded, a single `PauseDetected` event is sent to
//! the orchestrator.
//!
//! Stale firings are a real hazard here — a timer scheduled before a burst of
//! typing must not fire after it — so each arm cycle carries a generation
//! number and the callback additionally re-checks that the elapsed time since
//! the last activity is still at least the threshold.

pub mod detector;

pub use detector::PauseDetector;

/// Default quiet interval after which a pause is reported.
pub const DEFAULT_PAUSE_THRESHOLD_MS: u64 = 400;
