//! Text reconciliation — splicing corrected text into a live field.
//!
//! The field may have accumulated more text while the correction round trip
//! was in flight; the reconciler replaces only the portion that was actually
//! sent, preserving anything typed afterwards.  No locking is possible on
//! another application's text field, so the splice is a fuzzy-suffix
//! heuristic robust to benign drift rather than an exact-state diff.
//!
//! * [`splice::splice`] — the pure buffer-splice algorithm.
//! * [`apply`] — ordered [`ApplyStrategy`](apply::ApplyStrategy) chain, each
//!   write verified by re-read, tried until one sticks.
//! * [`apply_buffer_splice`] / [`apply_selection_replace`] — the two entry
//!   points the orchestrator uses.

pub mod apply;
pub mod clipboard;
pub mod keyboard;
pub mod splice;

pub use apply::{apply_with_fallback, default_strategies, ApplyStrategy};

use thiserror::Error;

use crate::selection::{FieldAccessor, FieldRange};

// ---------------------------------------------------------------------------
// ApplyError
// ---------------------------------------------------------------------------

/// Everything that can go wrong while applying corrected text to the field.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The accessor reported failure for a write call.
    #[error("field accessor rejected the write")]
    WriteRejected,

    /// The write reported success but the re-read value did not match.
    #[error("post-write verification mismatch")]
    VerificationMismatch,

    /// The focused field could not be read at all.
    #[error("field contents unavailable")]
    FieldUnavailable,

    /// Neither the recorded selection nor the original text could be located
    /// in the current field value — the correction is discarded.
    #[error("no reconciliation target found in the current field value")]
    ReconciliationMiss,

    /// Clipboard access failed during the paste strategy.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Key-event synthesis failed during the paste strategy.
    #[error("key simulation error: {0}")]
    KeySimulation(String),

    /// Every strategy in the fallback chain failed.
    #[error("all apply strategies exhausted")]
    StrategiesExhausted,
}

// ---------------------------------------------------------------------------
// Orchestrator entry points
// ---------------------------------------------------------------------------

/// Buffer-splice mode: re-read the live field, splice `corrected` over the
/// trailing portion matching `original`, and write the result back through
/// the strategy chain.
pub fn apply_buffer_splice(
    field: &dyn FieldAccessor,
    original: &str,
    corrected: &str,
    strategies: &[Box<dyn ApplyStrategy>],
) -> Result<(), ApplyError> {
    // Fresh read immediately before mutation — the field is a moving target.
    let current = field.current_text().ok_or(ApplyError::FieldUnavailable)?;
    let new_value = splice::splice(&current, original, corrected);
    apply_with_fallback(strategies, field, &new_value)
}

/// Selection-replace mode.
///
/// If `range` is still the live selection it is authoritative: the selection
/// is replaced directly.  The direct write is verified by re-read against the
/// expected full value — a write that reports success but reads back wrong
/// counts as a failure — and any failure falls back to writing the expected
/// value through the strategy chain.  If the selection has moved on, a
/// one-shot case-insensitive search for `original` inside the current value
/// decides where the correction lands; a miss discards the correction rather
/// than risking a compounding edit.
pub fn apply_selection_replace(
    field: &dyn FieldAccessor,
    range: &FieldRange,
    original: &str,
    corrected: &str,
    strategies: &[Box<dyn ApplyStrategy>],
) -> Result<(), ApplyError> {
    if field.selected_range().as_ref() == Some(range) {
        let current = field.current_text().ok_or(ApplyError::FieldUnavailable)?;
        let expected = splice::replace_range(&current, range, corrected)
            .ok_or(ApplyError::ReconciliationMiss)?;
        if field.set_selected_text(corrected)
            && field.current_text().as_deref() == Some(expected.as_str())
        {
            return Ok(());
        }
        log::warn!("reconcile: direct selection replace failed, trying full-value write");
        return apply_with_fallback(strategies, field, &expected);
    }

    // Stale selection: locate the recorded original text instead.
    let current = field.current_text().ok_or(ApplyError::FieldUnavailable)?;
    let new_value = splice::replace_first_ci(&current, original, corrected)
        .ok_or(ApplyError::ReconciliationMiss)?;
    apply_with_fallback(strategies, field, &new_value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::MockFieldAccessor;

    fn strategies() -> Vec<Box<dyn ApplyStrategy>> {
        vec![Box::new(apply::StructuralSet)]
    }

    #[test]
    fn buffer_splice_rewrites_field() {
        let field = MockFieldAccessor::new("teh cat");
        apply_buffer_splice(&field, "teh cat", "the cat", &strategies()).unwrap();
        assert_eq!(field.value().as_deref(), Some("the cat "));
    }

    #[test]
    fn buffer_splice_preserves_text_typed_during_flight() {
        let field = MockFieldAccessor::new("I saw teh cat sat outside");
        apply_buffer_splice(&field, "teh cat sat", "the cat sat", &strategies()).unwrap();
        let value = field.value().unwrap();
        assert!(value.starts_with("I saw "));
        assert!(value.ends_with("the cat sat "));
    }

    #[test]
    fn selection_replace_uses_live_range_when_current() {
        let field = MockFieldAccessor::new("hello wrold again");
        let range = crate::selection::FieldRange::new(6, 5);
        field.select(range.clone());
        apply_selection_replace(&field, &range, "wrold", "world", &strategies()).unwrap();
        // Only the range changed.
        assert_eq!(field.value().as_deref(), Some("hello world again"));
    }

    /// A selection write that reports success but changes nothing must fail
    /// verification and land through the strategy chain instead.
    #[test]
    fn silently_failed_selection_write_falls_back_and_verifies() {
        let field = MockFieldAccessor::new("hello wrold again");
        let range = crate::selection::FieldRange::new(6, 5);
        field.select(range.clone());
        field.ignore_set_selected_text();

        apply_selection_replace(&field, &range, "wrold", "world", &strategies()).unwrap();

        assert_eq!(field.value().as_deref(), Some("hello world again"));
        // The direct write was attempted first, then the fallback.
        assert_eq!(field.set_selected_calls(), 1);
        assert_eq!(field.set_value_calls(), 1);
    }

    #[test]
    fn stale_selection_falls_back_to_text_search() {
        let field = MockFieldAccessor::new("hello wrold again");
        // Selection recorded earlier, since moved elsewhere.
        field.select(crate::selection::FieldRange::new(0, 5));
        let recorded = crate::selection::FieldRange::new(6, 5);
        apply_selection_replace(&field, &recorded, "Wrold", "world", &strategies()).unwrap();
        assert_eq!(field.value().as_deref(), Some("hello world again"));
    }

    #[test]
    fn stale_selection_with_no_match_discards_correction() {
        let field = MockFieldAccessor::new("completely different text");
        let recorded = crate::selection::FieldRange::new(0, 5);
        field.clear_selection();
        let err = apply_selection_replace(&field, &recorded, "wrold", "world", &strategies())
            .unwrap_err();
        assert!(matches!(err, ApplyError::ReconciliationMiss));
        // Field untouched.
        assert_eq!(field.value().as_deref(), Some("completely different text"));
    }

    #[test]
    fn unreadable_field_is_reported() {
        let field = MockFieldAccessor::unfocused();
        let err = apply_buffer_splice(&field, "a", "b", &strategies()).unwrap_err();
        assert!(matches!(err, ApplyError::FieldUnavailable));
    }
}
