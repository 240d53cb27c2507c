//! Orchestrator state machine states and the typed-word buffer.

use super::Origin;

// ---------------------------------------------------------------------------
// EngineState
// ---------------------------------------------------------------------------

/// States of the correction engine.
///
/// ```text
/// Idle ──WordCompleted──▶ Buffering
/// Idle / Buffering ──trigger──▶ RequestInFlight(origin)
/// RequestInFlight ──arrival──▶ Replacing ──done──▶ Idle
/// RequestInFlight ──failure──▶ Idle
/// any ──Enter──▶ (buffer cleared)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Nothing buffered, nothing in flight.
    Idle,
    /// Completed words are accumulating, awaiting a trigger.
    Buffering,
    /// A correction round trip is outstanding.  The origin recorded here is
    /// the mutual-exclusion token: a second trigger is rejected while it
    /// exists.
    RequestInFlight(Origin),
    /// Corrected text is being written back into the live field.
    Replacing,
}

impl EngineState {
    /// Returns `true` while a correction round trip is outstanding.
    pub fn is_request_in_flight(&self) -> bool {
        matches!(self, EngineState::RequestInFlight(_))
    }

    /// A short human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            EngineState::Idle => "Idle",
            EngineState::Buffering => "Buffering",
            EngineState::RequestInFlight(_) => "RequestInFlight",
            EngineState::Replacing => "Replacing",
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState::Idle
    }
}

// ---------------------------------------------------------------------------
// WordBuffer
// ---------------------------------------------------------------------------

/// Ordered sequence of completed words since the last clear.
///
/// Owned exclusively by the orchestrator; cleared atomically (never
/// partially) on Enter, mouse click, or a successful buffer correction.
#[derive(Debug, Default)]
pub struct WordBuffer {
    words: Vec<String>,
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: String) {
        self.words.push(word);
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// The buffered text, words joined with single spaces.
    pub fn joined(&self) -> String {
        self.words.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(EngineState::default(), EngineState::Idle);
    }

    #[test]
    fn only_request_in_flight_reports_in_flight() {
        assert!(!EngineState::Idle.is_request_in_flight());
        assert!(!EngineState::Buffering.is_request_in_flight());
        assert!(!EngineState::Replacing.is_request_in_flight());
        assert!(EngineState::RequestInFlight(Origin::Buffer).is_request_in_flight());
    }

    #[test]
    fn labels() {
        assert_eq!(EngineState::Idle.label(), "Idle");
        assert_eq!(EngineState::Buffering.label(), "Buffering");
        assert_eq!(
            EngineState::RequestInFlight(Origin::Buffer).label(),
            "RequestInFlight"
        );
        assert_eq!(EngineState::Replacing.label(), "Replacing");
    }

    #[test]
    fn word_buffer_preserves_insertion_order() {
        let mut buf = WordBuffer::new();
        buf.push("teh".into());
        buf.push("cat".into());
        buf.push("sat".into());
        assert_eq!(buf.joined(), "teh cat sat");
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn word_buffer_clears_atomically() {
        let mut buf = WordBuffer::new();
        buf.push("a".into());
        buf.push("b".into());
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.joined(), "");
    }
}
