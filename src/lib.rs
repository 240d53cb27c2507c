//! Live keystroke correction engine.
//!
//! Watches what the user types system-wide, segments keystrokes into words,
//! and — on an explicit trigger — sends the recent text to an LLM endpoint
//! and splices the corrected result back into the focused text field without
//! clobbering anything typed in the meantime.
//!
//! # Pipeline
//!
//! ```text
//! rdev capture ─▶ segment ─▶ orchestrator ─▶ llm (async) ─▶ reconcile ─▶ field
//!                              ▲    ▲
//!                   pause ─────┘    └───── selection tracker
//! ```
//!
//! The [`orchestrator`] is the only writer of engine state; every other
//! module is a producer of [`orchestrator::EngineEvent`]s or a service the
//! orchestrator calls.

pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod pause;
pub mod reconcile;
pub mod segment;
pub mod selection;
pub mod source;
