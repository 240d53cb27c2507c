//! The debounce timer behind pause detection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::orchestrator::EngineEvent;

// ---------------------------------------------------------------------------
// PauseDetector
// ---------------------------------------------------------------------------

/// One-shot, re-armed quiet timer.
///
/// Each [`notify_activity`](Self::notify_activity) bumps a generation counter
/// and spawns a sleep for the threshold; when the sleep wakes it fires only
/// if (a) the generation is still current and (b) the wall-clock time since
/// the last activity is at least the threshold.  [`stop`](Self::stop)
/// invalidates any pending timer and clears the activity timestamp.
pub struct PauseDetector {
    threshold: Duration,
    last_activity: Arc<Mutex<Option<Instant>>>,
    generation: Arc<AtomicU64>,
    tx: mpsc::Sender<EngineEvent>,
}

impl PauseDetector {
    pub fn new(threshold: Duration, tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            threshold,
            last_activity: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    /// Record activity and (re)arm the one-shot timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn notify_activity(&self) {
        let armed_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *lock_activity(&self.last_activity) = Some(Instant::now());

        let generation = Arc::clone(&self.generation);
        let last_activity = Arc::clone(&self.last_activity);
        let tx = self.tx.clone();
        let threshold = self.threshold;

        tokio::spawn(async move {
            tokio::time::sleep(threshold).await;

            // Superseded by newer activity or a stop() — discard.
            if generation.load(Ordering::SeqCst) != armed_gen {
                return;
            }

            // Re-check elapsed time: a firing that races with new activity
            // must be discarded even if the generation check passed first.
            let quiet_long_enough = lock_activity(&last_activity)
                .map(|t| t.elapsed() >= threshold)
                .unwrap_or(false);
            if !quiet_long_enough {
                return;
            }

            if tx.send(EngineEvent::PauseDetected).await.is_err() {
                log::debug!("pause detector: engine channel closed");
            }
        });
    }

    /// Cancel any pending timer and clear the activity timestamp.
    ///
    /// No `PauseDetected` will be emitted until the next
    /// [`notify_activity`](Self::notify_activity).
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *lock_activity(&self.last_activity) = None;
    }
}

/// Lock the activity timestamp, recovering from a poisoned mutex — the
/// timestamp is a plain `Option<Instant>`, always valid even after a panic
/// in another holder.
fn lock_activity(mutex: &Mutex<Option<Instant>>) -> std::sync::MutexGuard<'_, Option<Instant>> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
