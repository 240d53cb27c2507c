//! Correction transport — the network round trip to the language model.
//!
//! * [`CorrectionTransport`] — async trait implemented by all backends.
//! * [`ApiCorrector`] — OpenAI-compatible `/v1/chat/completions` backend.
//! * [`PromptBuilder`] — builds the per-mode correction prompts.
//! * [`CredentialProvider`] / [`ConfigCredentials`] — secret lookup seam.
//! * [`TransportError`] — error variants for transport operations.
//!
//! One call at a time per orchestrator; there is no mid-flight cancellation
//! and no automatic retry — a failed correction leaves the user's text
//! untouched.

pub mod corrector;
pub mod credentials;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use corrector::{ApiCorrector, CorrectionTransport, TransportError};
pub use credentials::{ConfigCredentials, CredentialProvider};
pub use prompt::PromptBuilder;
