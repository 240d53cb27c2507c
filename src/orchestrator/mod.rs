//! Correction orchestrator — the coordinating state machine.
//!
//! Every collaborator (capture thread, pause detector, selection tracker,
//! transport completion) is a producer of typed [`EngineEvent`]s into one
//! `tokio::sync::mpsc` channel; the orchestrator consumes them serially, so
//! no two handlers ever run concurrently.  The transport call is the only
//! suspending operation and runs off the coordinator as a spawned task that
//! re-enters through the same channel with [`EngineEvent::CorrectionArrived`].
//!
//! ```text
//! capture ──Keystroke──────────────┐
//! pause detector ──PauseDetected───┤
//! selection poll ──SelectionChanged┼──▶ orchestrator ──▶ reconcile ──▶ field
//! hotkey ──CorrectionRequested─────┤         │
//! transport task ──CorrectionArrived◀────────┘ (spawned per request)
//! ```

pub mod runner;
pub mod state;

pub use runner::CorrectionOrchestrator;
pub use state::{EngineState, WordBuffer};

use crate::config::CorrectionMode;
use crate::llm::TransportError;
use crate::segment::KeystrokeEvent;
use crate::selection::{FieldRange, SelectionSnapshot};

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// What a correction request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The accumulated word buffer (or the full field when the buffer is
    /// empty).
    Buffer,
    /// An explicit user selection, recorded at dispatch time.
    Selection(FieldRange),
}

// ---------------------------------------------------------------------------
// EngineEvent
// ---------------------------------------------------------------------------

/// Everything the orchestrator reacts to.
#[derive(Debug)]
pub enum EngineEvent {
    /// A classified keystroke or mouse press from the capture layer.
    Keystroke(KeystrokeEvent),
    /// The pause detector's quiet interval elapsed.
    PauseDetected,
    /// The polled selection changed; `None` means nothing useful is
    /// selected any more.
    SelectionChanged(Option<SelectionSnapshot>),
    /// Explicit user-initiated correction trigger.
    CorrectionRequested,
    /// Change the mode used for the *next* dispatched request.
    SetMode(CorrectionMode),
    /// A transport round trip finished.  Carries the origin and the exact
    /// text that was sent, so reconciliation does not depend on state that
    /// may have changed during the flight.
    CorrectionArrived {
        outcome: Result<String, TransportError>,
        origin: Origin,
        original: String,
    },
    /// Stop the run loop.
    Shutdown,
}

// ---------------------------------------------------------------------------
// UiSignal
// ---------------------------------------------------------------------------

/// Signals to the UI collaborator.  Rendering is not this crate's concern;
/// whoever owns the affordance widget consumes these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    /// Enough text has accumulated and the user paused — offer a correction.
    ShowAffordance,
    /// The affordance is no longer relevant (debounced after Enter).
    HideAffordance,
    /// A user-facing configuration problem (e.g. missing API key).
    ConfigurationError(String),
}
