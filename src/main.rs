//! Application entry point — typefix.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Resolve credentials and build the transport ([`ApiCorrector`]).
//! 5. Create the engine and UI-signal channels.
//! 6. Spawn the selection tracker and the UI-signal consumer.
//! 7. Start the rdev capture thread.
//! 8. Run the orchestrator on the runtime until Ctrl-C.

use std::sync::Arc;

use tokio::sync::mpsc;
use typefix::{
    config::AppConfig,
    llm::{ApiCorrector, ConfigCredentials, CredentialProvider},
    orchestrator::{CorrectionOrchestrator, EngineEvent, UiSignal},
    selection::{FieldAccessor, NullFieldAccessor, SelectionTracker},
    source::{parse_key, EventSource, RdevEventSource},
};

// ---------------------------------------------------------------------------
// UI-signal consumer
// ---------------------------------------------------------------------------

/// Drains [`UiSignal`]s and logs them.
///
/// The engine deliberately has no rendering of its own; a desktop shell
/// would replace this task with something that draws the affordance.
async fn run_ui_consumer(mut ui_rx: mpsc::Receiver<UiSignal>) {
    while let Some(signal) = ui_rx.recv().await {
        match signal {
            UiSignal::ShowAffordance => log::info!("ui: correction available"),
            UiSignal::HideAffordance => log::info!("ui: correction affordance dismissed"),
            UiSignal::ConfigurationError(msg) => log::error!("ui: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("typefix starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");
    let _guard = rt.enter();

    // 4. Credentials + transport
    let credentials = Arc::new(ConfigCredentials::from_config(&config.llm));
    if config.llm.requires_api_key && credentials.api_key().is_none() {
        log::warn!("No API key configured; correction requests will be refused until one is set");
    }
    let transport = Arc::new(ApiCorrector::from_config(
        &config.llm,
        credentials.api_key(),
    ));

    // 5. Channels
    let (engine_tx, engine_rx) = mpsc::channel::<EngineEvent>(256);
    let (ui_tx, ui_rx) = mpsc::channel::<UiSignal>(32);

    // Focused-field access is platform-specific; the null accessor keeps the
    // engine running headless (buffer corrections still work end to end once
    // a real accessor is plugged in here).
    let field: Arc<dyn FieldAccessor> = Arc::new(NullFieldAccessor);

    // 6. Selection tracker + UI consumer
    let _tracker = SelectionTracker::spawn(
        Arc::clone(&field),
        config.timing.selection_poll(),
        engine_tx.clone(),
    );
    rt.spawn(run_ui_consumer(ui_rx));

    // 7. Capture thread
    let trigger_key = parse_key(&config.hotkey.trigger_key).unwrap_or(rdev::Key::F8);
    log::info!("trigger key: {trigger_key:?}");
    let source: Arc<dyn EventSource> = Arc::new(RdevEventSource::start(
        Some(trigger_key),
        engine_tx.clone(),
    ));

    // 8. Orchestrator — runs until Ctrl-C
    let orchestrator = CorrectionOrchestrator::new(
        config,
        source,
        field,
        transport,
        credentials,
        engine_tx.clone(),
        ui_tx,
    );

    rt.block_on(async move {
        let engine = tokio::spawn(orchestrator.run(engine_rx));

        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to wait for Ctrl-C: {e}");
        }
        log::info!("shutdown requested");
        let _ = engine_tx.send(EngineEvent::Shutdown).await;
        let _ = engine.await;
    });
}
