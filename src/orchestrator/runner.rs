//! The orchestrator's event loop and state-transition function.
//!
//! # Request lifecycle
//!
//! ```text
//! CorrectionRequested
//!   ├─ in flight?        → rejected (logged), nothing queued
//!   ├─ valid selection?  → origin = Selection(range), text = snapshot
//!   ├─ words buffered?   → origin = Buffer, text = joined words
//!   ├─ else              → origin = Buffer, text = full field read
//!   └─ empty text        → no-op
//!
//! CorrectionArrived
//!   ├─ Err / empty       → discard, → Idle
//!   ├─ Selection(range)  → re-validate range; direct replace or
//!   │                      original-text search; miss → discard
//!   └─ Buffer            → pause capture, splice into fresh field read,
//!                          clear word buffer, resume after settle delay
//! ```
//!
//! The in-flight origin stored in [`EngineState::RequestInFlight`] is the
//! sole concurrency guard: at most one correction round trip exists per
//! orchestrator, for any interleaving of triggers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{AppConfig, CorrectionMode};
use crate::llm::{CorrectionTransport, CredentialProvider, TransportError};
use crate::pause::PauseDetector;
use crate::reconcile;
use crate::segment::{KeystrokeEvent, SegmenterEvent, WordSegmenter};
use crate::selection::{FieldAccessor, SelectionSnapshot};
use crate::source::EventSource;

use super::state::{EngineState, WordBuffer};
use super::{EngineEvent, Origin, UiSignal};

// ---------------------------------------------------------------------------
// CorrectionOrchestrator
// ---------------------------------------------------------------------------

/// Owns the word buffer, the in-flight flag and the mode; reacts to every
/// [`EngineEvent`].
///
/// Create with [`CorrectionOrchestrator::new`], then either call
/// [`run`](Self::run) inside a tokio task or drive it directly with
/// [`handle_event`](Self::handle_event).
pub struct CorrectionOrchestrator {
    state: EngineState,
    words: WordBuffer,
    segmenter: WordSegmenter,
    selection: Option<SelectionSnapshot>,
    mode: CorrectionMode,
    pause: PauseDetector,
    source: Arc<dyn EventSource>,
    field: Arc<dyn FieldAccessor>,
    transport: Arc<dyn CorrectionTransport>,
    credentials: Arc<dyn CredentialProvider>,
    config: AppConfig,
    /// Clone of the engine channel sender, used by spawned transport tasks
    /// to deliver their result back onto the coordinator.
    self_tx: mpsc::Sender<EngineEvent>,
    ui_tx: mpsc::Sender<UiSignal>,
    /// Generation counter for the debounced hide-affordance signal.
    hide_generation: Arc<AtomicU64>,
}

impl CorrectionOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        source: Arc<dyn EventSource>,
        field: Arc<dyn FieldAccessor>,
        transport: Arc<dyn CorrectionTransport>,
        credentials: Arc<dyn CredentialProvider>,
        self_tx: mpsc::Sender<EngineEvent>,
        ui_tx: mpsc::Sender<UiSignal>,
    ) -> Self {
        let pause = PauseDetector::new(config.timing.pause_threshold(), self_tx.clone());
        Self {
            state: EngineState::Idle,
            words: WordBuffer::new(),
            segmenter: WordSegmenter::new(),
            selection: None,
            mode: config.mode,
            pause,
            source,
            field,
            transport,
            credentials,
            config,
            self_tx,
            ui_tx,
            hide_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current state (read-mostly; exposed for diagnostics and tests).
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The buffered words.
    pub fn words(&self) -> &WordBuffer {
        &self.words
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until the channel closes or
    /// [`EngineEvent::Shutdown`] arrives.
    pub async fn run(mut self, mut rx: mpsc::Receiver<EngineEvent>) {
        while let Some(event) = rx.recv().await {
            if matches!(event, EngineEvent::Shutdown) {
                break;
            }
            self.handle_event(event).await;
        }
        self.source.stop();
        log::info!("orchestrator: shutting down");
    }

    /// The single-threaded state-transition function.  All collaborator
    /// traffic funnels through here, one event at a time.
    pub async fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Keystroke(keystroke) => self.handle_keystroke(keystroke).await,
            EngineEvent::PauseDetected => self.handle_pause_detected().await,
            EngineEvent::SelectionChanged(snapshot) => {
                self.selection = snapshot;
            }
            EngineEvent::SetMode(mode) => {
                log::debug!("orchestrator: mode → {mode:?} (affects next request only)");
                self.mode = mode;
            }
            EngineEvent::CorrectionRequested => self.handle_trigger().await,
            EngineEvent::CorrectionArrived {
                outcome,
                origin,
                original,
            } => self.handle_arrival(outcome, origin, original).await,
            EngineEvent::Shutdown => {}
        }
    }

    // -----------------------------------------------------------------------
    // Keystrokes
    // -----------------------------------------------------------------------

    async fn handle_keystroke(&mut self, keystroke: KeystrokeEvent) {
        for event in self.segmenter.feed(keystroke) {
            match event {
                SegmenterEvent::WordCompleted(word) => {
                    self.pause.notify_activity();
                    log::debug!("orchestrator: word completed {word:?}");
                    self.words.push(word);
                    if matches!(self.state, EngineState::Idle) {
                        self.state = EngineState::Buffering;
                    }
                    self.cancel_pending_hide();
                }
                SegmenterEvent::CharacterTyped(_) => {
                    self.pause.notify_activity();
                }
                SegmenterEvent::EnterPressed => {
                    log::debug!("orchestrator: Enter — clearing word buffer");
                    self.words.clear();
                    self.pause.stop();
                    if matches!(self.state, EngineState::Buffering) {
                        self.state = EngineState::Idle;
                    }
                    self.schedule_hide();
                }
                SegmenterEvent::MouseDown => {
                    // The caret moved somewhere unknown; the buffered words
                    // no longer describe the field tail.
                    log::debug!("orchestrator: mouse down — clearing word buffer");
                    self.segmenter.reset();
                    self.words.clear();
                    self.pause.stop();
                    if matches!(self.state, EngineState::Buffering) {
                        self.state = EngineState::Idle;
                    }
                    self.schedule_hide();
                }
            }
        }
    }

    async fn handle_pause_detected(&mut self) {
        if self.words.is_empty() {
            return;
        }
        // A single trimmed character is not worth an affordance.
        if self.words.joined().trim().chars().count() <= 1 {
            return;
        }
        log::debug!("orchestrator: pause detected with buffered text — showing affordance");
        let _ = self.ui_tx.send(UiSignal::ShowAffordance).await;
    }

    // -----------------------------------------------------------------------
    // Trigger → dispatch
    // -----------------------------------------------------------------------

    async fn handle_trigger(&mut self) {
        if self.state.is_request_in_flight() {
            // Mutual exclusion: never two round trips racing for one field.
            log::warn!("orchestrator: correction already in flight — trigger rejected");
            return;
        }

        let (origin, source_text) = self.resolve_request();
        if source_text.trim().is_empty() {
            log::debug!("orchestrator: nothing to correct — trigger ignored");
            return;
        }

        if self.config.llm.requires_api_key && self.credentials.api_key().is_none() {
            log::warn!("orchestrator: no API key configured — request not attempted");
            let _ = self
                .ui_tx
                .send(UiSignal::ConfigurationError(
                    "No API key configured for the correction endpoint".into(),
                ))
                .await;
            return;
        }

        // Mode is captured here; an in-flight request never observes a later
        // mode change.
        let mode = self.mode;
        let transport = Arc::clone(&self.transport);
        let tx = self.self_tx.clone();

        log::debug!(
            "orchestrator: dispatching {mode:?} correction, origin {origin:?}, {} chars",
            source_text.len()
        );
        self.state = EngineState::RequestInFlight(origin.clone());

        tokio::spawn(async move {
            let outcome = transport.correct(&source_text, mode).await;
            let _ = tx
                .send(EngineEvent::CorrectionArrived {
                    outcome,
                    origin,
                    original: source_text,
                })
                .await;
        });
    }

    /// Decide what this request targets and what text to send.
    fn resolve_request(&self) -> (Origin, String) {
        if let Some(snapshot) = &self.selection {
            // The snapshot is only trusted if the live selection still
            // matches it.
            if !snapshot.text.is_empty()
                && self.field.selected_range().as_ref() == Some(&snapshot.range)
            {
                return (
                    Origin::Selection(snapshot.range.clone()),
                    snapshot.text.clone(),
                );
            }
        }

        let joined = self.words.joined();
        let text = if !joined.trim().is_empty() {
            joined
        } else {
            self.field.current_text().unwrap_or_default()
        };
        (Origin::Buffer, text)
    }

    // -----------------------------------------------------------------------
    // Arrival → reconcile
    // -----------------------------------------------------------------------

    async fn handle_arrival(
        &mut self,
        outcome: Result<String, TransportError>,
        origin: Origin,
        original: String,
    ) {
        if !self.state.is_request_in_flight() {
            log::warn!("orchestrator: correction arrived with no request in flight — discarding");
            return;
        }

        let corrected = match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::warn!("orchestrator: empty correction — discarding");
                self.state = EngineState::Idle;
                return;
            }
            Err(e) => {
                // No retry: the user's original text stays untouched.
                log::warn!("orchestrator: transport failed ({e}) — leaving text untouched");
                self.state = EngineState::Idle;
                return;
            }
        };

        match origin {
            Origin::Selection(range) => {
                self.state = EngineState::Replacing;
                let field = Arc::clone(&self.field);
                let result = tokio::task::spawn_blocking(move || {
                    reconcile::apply_selection_replace(
                        field.as_ref(),
                        &range,
                        &original,
                        &corrected,
                        &reconcile::default_strategies(),
                    )
                })
                .await;
                self.log_apply_result(result);
                self.state = EngineState::Idle;
            }
            Origin::Buffer => {
                self.state = EngineState::Replacing;

                // Suppress self-observation of the programmatic edit.
                self.source.pause();

                let field = Arc::clone(&self.field);
                let result = tokio::task::spawn_blocking(move || {
                    reconcile::apply_buffer_splice(
                        field.as_ref(),
                        &original,
                        &corrected,
                        &reconcile::default_strategies(),
                    )
                })
                .await;
                self.log_apply_result(result);

                self.words.clear();
                self.resume_source_after_settle();
                self.state = EngineState::Idle;
            }
        }
    }

    fn log_apply_result(
        &self,
        result: Result<Result<(), reconcile::ApplyError>, tokio::task::JoinError>,
    ) {
        match result {
            Ok(Ok(())) => log::debug!("orchestrator: correction applied"),
            Ok(Err(e)) => log::warn!("orchestrator: correction discarded: {e}"),
            Err(e) => log::error!("orchestrator: apply task panicked: {e}"),
        }
    }

    /// Resume the event source once the programmatic edit has settled.
    fn resume_source_after_settle(&self) {
        let source = Arc::clone(&self.source);
        let settle = self.config.timing.resume_settle();
        tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            source.resume();
        });
    }

    // -----------------------------------------------------------------------
    // Affordance hide debounce
    // -----------------------------------------------------------------------

    fn cancel_pending_hide(&self) {
        self.hide_generation.fetch_add(1, Ordering::SeqCst);
    }

    fn schedule_hide(&self) {
        let armed_gen = self.hide_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.hide_generation);
        let ui_tx = self.ui_tx.clone();
        let delay = self.config.timing.hide_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == armed_gen {
                let _ = ui_tx.send(UiSignal::HideAffordance).await;
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
