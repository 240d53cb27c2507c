//! Dedicated OS-thread capture using `rdev::listen`.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  [`EventSource::stop`]
//! sets a flag so the callback silently discards further events, but the OS
//! thread itself will remain blocked in the rdev event loop until the process
//! exits.  This is safe and expected — rdev holds no resources that need
//! explicit cleanup.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use crate::orchestrator::EngineEvent;
use crate::segment::KeystrokeEvent;

use super::EventSource;

// ---------------------------------------------------------------------------
// RdevEventSource
// ---------------------------------------------------------------------------

/// Handle to the running capture thread.
///
/// Construct with [`RdevEventSource::start`].  `pause()` suppresses delivery
/// while a programmatic edit is being written; `stop()` suppresses it
/// permanently.
pub struct RdevEventSource {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    /// Kept alive so the thread is not detached prematurely; never joined
    /// because `rdev::listen` never returns.
    _thread: std::thread::JoinHandle<()>,
}

impl RdevEventSource {
    /// Spawn the capture thread.
    ///
    /// * `trigger_key` — pressing it sends `CorrectionRequested` instead of a
    ///   keystroke (the explicit correction trigger).
    /// * `tx` — the coordinator channel.  The callback uses `try_send`; if
    ///   the coordinator falls behind, events are dropped with a log line
    ///   rather than blocking the capture callback.
    pub fn start(trigger_key: Option<rdev::Key>, tx: mpsc::Sender<EngineEvent>) -> Self {
        let paused = Arc::new(AtomicBool::new(false));
        let stopped = Arc::new(AtomicBool::new(false));
        let paused_cb = Arc::clone(&paused);
        let stopped_cb = Arc::clone(&stopped);

        let thread = std::thread::Builder::new()
            .name("keystroke-capture".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stopped_cb.load(Ordering::Relaxed) || paused_cb.load(Ordering::Relaxed) {
                        return;
                    }
                    for engine_event in translate(&event, trigger_key) {
                        if tx.try_send(engine_event).is_err() {
                            log::debug!("capture: coordinator channel full, dropping event");
                        }
                    }
                });

                if let Err(e) = result {
                    // Usually a missing input-capture permission.
                    log::error!("capture: rdev::listen exited with error: {:?}", e);
                }
            })
            .expect("failed to spawn keystroke-capture thread");

        Self {
            paused,
            stopped,
            _thread: thread,
        }
    }
}

impl EventSource for RdevEventSource {
    fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

/// Translate one rdev event into zero or more engine events.
fn translate(event: &rdev::Event, trigger_key: Option<rdev::Key>) -> Vec<EngineEvent> {
    match event.event_type {
        rdev::EventType::KeyPress(key) => {
            if Some(key) == trigger_key {
                return vec![EngineEvent::CorrectionRequested];
            }
            match key {
                rdev::Key::Backspace | rdev::Key::Delete => {
                    vec![EngineEvent::Keystroke(KeystrokeEvent::Backspace)]
                }
                rdev::Key::Return | rdev::Key::KpReturn => {
                    vec![EngineEvent::Keystroke(KeystrokeEvent::Enter)]
                }
                _ => {
                    // rdev attaches the layout-translated text to the event;
                    // classify each character it produced.
                    let Some(name) = event.name.as_deref() else {
                        return Vec::new();
                    };
                    name.chars()
                        .filter_map(KeystrokeEvent::classify)
                        .map(EngineEvent::Keystroke)
                        .collect()
                }
            }
        }
        rdev::EventType::ButtonPress(_) => {
            vec![EngineEvent::Keystroke(KeystrokeEvent::MouseDown)]
        }
        _ => Vec::new(),
    }
}
