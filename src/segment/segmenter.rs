//! The word segmenter state machine.
//!
//! One state variable (the in-progress word accumulator), no suspension,
//! purely synchronous per input event.  A single [`KeystrokeEvent`] can emit
//! up to two [`SegmenterEvent`]s (newline on a non-empty accumulator emits
//! `WordCompleted` then `EnterPressed`), so [`WordSegmenter::feed`] returns a
//! `Vec`.

use super::{is_boundary_char, is_word_char, KeystrokeEvent, SegmenterEvent};

// ---------------------------------------------------------------------------
// WordSegmenter
// ---------------------------------------------------------------------------

/// Folds classified keystrokes into word-level events.
#[derive(Debug, Default)]
pub struct WordSegmenter {
    /// The in-progress word.
    accumulator: String,
}

impl WordSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current in-progress word (not yet completed by a boundary).
    pub fn in_progress(&self) -> &str {
        &self.accumulator
    }

    /// Discard the in-progress word without emitting anything.
    pub fn reset(&mut self) {
        self.accumulator.clear();
    }

    /// Feed one classified keystroke; returns the events it produced, in
    /// emission order.
    pub fn feed(&mut self, event: KeystrokeEvent) -> Vec<SegmenterEvent> {
        let mut out = Vec::with_capacity(2);
        match event {
            KeystrokeEvent::Character(text) => {
                // Translated text can carry several characters; each one is
                // classified again so embedded boundaries still split words.
                for c in text.chars() {
                    if is_boundary_char(c) {
                        self.complete_word(&mut out);
                        out.push(SegmenterEvent::CharacterTyped(Some(c)));
                    } else if is_word_char(c) {
                        self.accumulator.push(c);
                        out.push(SegmenterEvent::CharacterTyped(Some(c)));
                    }
                    // other control characters are dropped
                }
            }
            KeystrokeEvent::Backspace => {
                self.accumulator.pop();
                out.push(SegmenterEvent::CharacterTyped(None));
            }
            KeystrokeEvent::Enter => {
                self.complete_word(&mut out);
                out.push(SegmenterEvent::EnterPressed);
            }
            KeystrokeEvent::WordBoundary(c) => {
                self.complete_word(&mut out);
                out.push(SegmenterEvent::CharacterTyped(Some(c)));
            }
            KeystrokeEvent::MouseDown => {
                out.push(SegmenterEvent::MouseDown);
            }
        }
        out
    }

    /// Emit `WordCompleted` for a non-empty accumulator and clear it.
    fn complete_word(&mut self, out: &mut Vec<SegmenterEvent>) {
        if !self.accumulator.is_empty() {
            out.push(SegmenterEvent::WordCompleted(std::mem::take(
                &mut self.accumulator,
            )));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
