//! Apply strategies — increasingly invasive ways of writing the new field
//! value, tried in order until one sticks.
//!
//! Every strategy verifies its own write by re-reading the field and
//! comparing for equality; a write that "succeeds" but reads back different
//! content counts as a failure and the next strategy is tried.  Strategies
//! replace the whole value in one step, so retrying within the chain never
//! leaves a partial application behind.

use std::time::Duration;

use crate::selection::FieldAccessor;

use super::clipboard::{restore_clipboard, save_clipboard, set_clipboard};
use super::keyboard::simulate_paste;
use super::ApplyError;

// ---------------------------------------------------------------------------
// ApplyStrategy
// ---------------------------------------------------------------------------

/// One way of writing `text` as the field's new full value.
pub trait ApplyStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, field: &dyn FieldAccessor, text: &str) -> Result<(), ApplyError>;
}

/// Re-read the field and require exact equality with what was written.
fn verify(field: &dyn FieldAccessor, expected: &str) -> Result<(), ApplyError> {
    match field.current_text() {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(ApplyError::VerificationMismatch),
        None => Err(ApplyError::FieldUnavailable),
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// (a) Structural set of the field's value attribute, verified by re-read.
pub struct StructuralSet;

impl ApplyStrategy for StructuralSet {
    fn name(&self) -> &'static str {
        "structural-set"
    }

    fn apply(&self, field: &dyn FieldAccessor, text: &str) -> Result<(), ApplyError> {
        if !field.set_value(text) {
            return Err(ApplyError::WriteRejected);
        }
        verify(field, text)
    }
}

/// (b) Select the whole field, replace the selection, verify by re-read.
pub struct SelectAllAndSet;

impl ApplyStrategy for SelectAllAndSet {
    fn name(&self) -> &'static str {
        "select-all-and-set"
    }

    fn apply(&self, field: &dyn FieldAccessor, text: &str) -> Result<(), ApplyError> {
        if !field.select_all() {
            return Err(ApplyError::WriteRejected);
        }
        if !field.set_selected_text(text) {
            return Err(ApplyError::WriteRejected);
        }
        verify(field, text)
    }
}

/// (c) Last resort: select all and paste via the system clipboard.
///
/// The original clipboard content is saved beforehand and restored afterwards
/// (best-effort): set, wait for the clipboard flush, paste, wait for the
/// target app to finish, restore.
pub struct ClipboardPaste {
    /// Wait after setting the clipboard before pasting.
    pub flush_delay: Duration,
    /// Wait after pasting before restoring the clipboard and verifying.
    pub settle_delay: Duration,
}

impl Default for ClipboardPaste {
    fn default() -> Self {
        Self {
            flush_delay: Duration::from_millis(50),
            settle_delay: Duration::from_millis(100),
        }
    }
}

impl ApplyStrategy for ClipboardPaste {
    fn name(&self) -> &'static str {
        "clipboard-paste"
    }

    fn apply(&self, field: &dyn FieldAccessor, text: &str) -> Result<(), ApplyError> {
        if !field.select_all() {
            return Err(ApplyError::WriteRejected);
        }

        let saved = save_clipboard()?;
        set_clipboard(text)?;
        std::thread::sleep(self.flush_delay);

        let paste_result = simulate_paste();
        std::thread::sleep(self.settle_delay);

        // Restore whatever was in the clipboard before us, even on failure.
        let _ = restore_clipboard(saved);
        paste_result?;

        verify(field, text)
    }
}

// ---------------------------------------------------------------------------
// Fallback combinator
// ---------------------------------------------------------------------------

/// Try each strategy in order; the first verified write wins.
pub fn apply_with_fallback(
    strategies: &[Box<dyn ApplyStrategy>],
    field: &dyn FieldAccessor,
    text: &str,
) -> Result<(), ApplyError> {
    for strategy in strategies {
        match strategy.apply(field, text) {
            Ok(()) => {
                log::debug!("reconcile: applied via '{}'", strategy.name());
                return Ok(());
            }
            Err(e) => {
                log::warn!("reconcile: strategy '{}' failed: {e}", strategy.name());
            }
        }
    }
    Err(ApplyError::StrategiesExhausted)
}

/// The production chain, in escalation order.
pub fn default_strategies() -> Vec<Box<dyn ApplyStrategy>> {
    vec![
        Box::new(StructuralSet),
        Box::new(SelectAllAndSet),
        Box::new(ClipboardPaste::default()),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::MockFieldAccessor;

    #[test]
    fn structural_set_writes_and_verifies() {
        let field = MockFieldAccessor::new("old");
        StructuralSet.apply(&field, "new value ").unwrap();
        assert_eq!(field.value().as_deref(), Some("new value "));
    }

    #[test]
    fn structural_set_detects_garbled_write() {
        let field = MockFieldAccessor::new("old");
        field.corrupt_set_value();
        let err = StructuralSet.apply(&field, "new").unwrap_err();
        assert!(matches!(err, ApplyError::VerificationMismatch));
    }

    #[test]
    fn select_all_and_set_replaces_whole_value() {
        let field = MockFieldAccessor::new("old content");
        SelectAllAndSet.apply(&field, "fresh ").unwrap();
        assert_eq!(field.value().as_deref(), Some("fresh "));
    }

    #[test]
    fn fallback_moves_to_second_strategy_on_rejection() {
        let field = MockFieldAccessor::new("old");
        field.reject_set_value();

        let strategies: Vec<Box<dyn ApplyStrategy>> =
            vec![Box::new(StructuralSet), Box::new(SelectAllAndSet)];
        apply_with_fallback(&strategies, &field, "replaced ").unwrap();

        assert_eq!(field.value().as_deref(), Some("replaced "));
        assert_eq!(field.set_value_calls(), 1);
        assert_eq!(field.set_selected_calls(), 1);
    }

    #[test]
    fn fallback_exhaustion_is_reported() {
        let field = MockFieldAccessor::new("old");
        field.reject_set_value();
        field.reject_select_all();

        let strategies: Vec<Box<dyn ApplyStrategy>> =
            vec![Box::new(StructuralSet), Box::new(SelectAllAndSet)];
        let err = apply_with_fallback(&strategies, &field, "x").unwrap_err();
        assert!(matches!(err, ApplyError::StrategiesExhausted));
        // Field must be untouched after a fully failed chain.
        assert_eq!(field.value().as_deref(), Some("old"));
    }

    #[test]
    fn default_chain_has_three_strategies_in_escalation_order() {
        let chain = default_strategies();
        let names: Vec<&str> = chain.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["structural-set", "select-all-and-set", "clipboard-paste"]
        );
    }
}
