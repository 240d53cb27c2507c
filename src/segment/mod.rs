//! Keystroke classification and word segmentation.
//!
//! The capture glue translates raw key codes into characters and classifies
//! each one into a [`KeystrokeEvent`] via [`KeystrokeEvent::classify`].  The
//! [`WordSegmenter`] then folds the event stream into higher-level
//! [`SegmenterEvent`]s: completed words, typing activity, Enter presses and
//! mouse clicks.
//!
//! ```text
//! raw char ──classify──▶ KeystrokeEvent ──feed──▶ [SegmenterEvent]
//! ```
//!
//! Segmentation is a pure, order-preserving function of the input: the
//! concatenation of all `WordCompleted` payloads equals the typed input with
//! boundary characters removed and backspaces applied.

pub mod segmenter;

pub use segmenter::WordSegmenter;

// ---------------------------------------------------------------------------
// Word boundaries
// ---------------------------------------------------------------------------

/// Characters that terminate an in-progress word.
pub const BOUNDARY_CHARS: [char; 6] = [' ', '\t', '.', ',', '!', '?'];

/// Returns `true` for characters that terminate an in-progress word.
pub fn is_boundary_char(c: char) -> bool {
    BOUNDARY_CHARS.contains(&c)
}

/// Returns `true` for characters that extend an in-progress word: any
/// non-ASCII code point, or printable ASCII (≥ 0x20) that is not a boundary.
pub fn is_word_char(c: char) -> bool {
    if is_boundary_char(c) {
        return false;
    }
    !c.is_ascii() || (c as u32 >= 0x20 && c != '\u{7f}')
}

// ---------------------------------------------------------------------------
// KeystrokeEvent
// ---------------------------------------------------------------------------

/// A single classified keystroke or mouse event.
///
/// Ephemeral — produced by the capture thread, consumed synchronously by the
/// segmenter, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeEvent {
    /// Printable text, as translated by the platform key layer.  May carry
    /// more than one character (dead-key composition, IME output).
    Character(String),
    /// Backspace or forward delete.
    Backspace,
    /// The Return / Enter key.
    Enter,
    /// A word-terminating character (space, tab, `.`, `,`, `!`, `?`).
    WordBoundary(char),
    /// Any mouse button press — the caret probably moved.
    MouseDown,
}

impl KeystrokeEvent {
    /// Classify a single translated character.
    ///
    /// Returns `None` for control characters that carry no meaning for the
    /// segmenter (they are dropped without producing an event).
    pub fn classify(c: char) -> Option<KeystrokeEvent> {
        match c {
            '\n' | '\r' => Some(KeystrokeEvent::Enter),
            '\u{8}' | '\u{7f}' => Some(KeystrokeEvent::Backspace),
            c if is_boundary_char(c) => Some(KeystrokeEvent::WordBoundary(c)),
            c if is_word_char(c) => Some(KeystrokeEvent::Character(c.to_string())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SegmenterEvent
// ---------------------------------------------------------------------------

/// Output of the [`WordSegmenter`], consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmenterEvent {
    /// The in-progress word was completed by a boundary or newline.
    WordCompleted(String),
    /// Typing activity.  Carries the boundary character that triggered it,
    /// when there was one (`None` for backspace).
    CharacterTyped(Option<char>),
    /// The Return / Enter key was pressed.
    EnterPressed,
    /// A mouse button was pressed.
    MouseDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_printable_ascii() {
        assert_eq!(
            KeystrokeEvent::classify('a'),
            Some(KeystrokeEvent::Character("a".into()))
        );
        assert_eq!(
            KeystrokeEvent::classify('Z'),
            Some(KeystrokeEvent::Character("Z".into()))
        );
    }

    #[test]
    fn classify_non_ascii_is_character() {
        assert_eq!(
            KeystrokeEvent::classify('é'),
            Some(KeystrokeEvent::Character("é".into()))
        );
        assert_eq!(
            KeystrokeEvent::classify('ก'),
            Some(KeystrokeEvent::Character("ก".into()))
        );
    }

    #[test]
    fn classify_boundaries() {
        for c in BOUNDARY_CHARS {
            assert_eq!(
                KeystrokeEvent::classify(c),
                Some(KeystrokeEvent::WordBoundary(c))
            );
        }
    }

    #[test]
    fn classify_newline_and_backspace() {
        assert_eq!(KeystrokeEvent::classify('\n'), Some(KeystrokeEvent::Enter));
        assert_eq!(KeystrokeEvent::classify('\r'), Some(KeystrokeEvent::Enter));
        assert_eq!(
            KeystrokeEvent::classify('\u{8}'),
            Some(KeystrokeEvent::Backspace)
        );
        assert_eq!(
            KeystrokeEvent::classify('\u{7f}'),
            Some(KeystrokeEvent::Backspace)
        );
    }

    #[test]
    fn classify_other_control_chars_dropped() {
        assert_eq!(KeystrokeEvent::classify('\u{1}'), None);
        assert_eq!(KeystrokeEvent::classify('\u{1b}'), None);
    }
}
