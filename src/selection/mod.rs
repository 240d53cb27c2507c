//! Focused-field access and selection tracking.
//!
//! The live editable field belongs to some other application; this module
//! only defines the seam through which it is read and written.
//!
//! * [`FieldAccessor`] — trait over the platform accessibility glue
//!   (read the field value, read/replace the selection).
//! * [`SelectionSnapshot`] / [`FieldRange`] — the last observed selection.
//!   A snapshot is stale the instant a newer one arrives or the field is
//!   mutated, so it is always re-validated against the live field before use.
//! * [`SelectionTracker`] — fixed-interval polling task that emits
//!   `SelectionChanged` events.  Polling is a deliberate simplification: a
//!   native change-notification API does not exist uniformly across the text
//!   fields we target.

pub mod tracker;

pub use tracker::SelectionTracker;

// ---------------------------------------------------------------------------
// FieldRange / SelectionSnapshot
// ---------------------------------------------------------------------------

/// A character range inside the focused field (accessibility-style
/// location + length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRange {
    pub location: usize,
    pub length: usize,
}

impl FieldRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// The selection as last observed by the tracker.
///
/// Replaced wholesale on every `SelectionChanged`; never trusted without
/// re-validation against the live field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub text: String,
    pub range: FieldRange,
}

// ---------------------------------------------------------------------------
// FieldAccessor
// ---------------------------------------------------------------------------

/// Seam over the platform focused-element accessor.
///
/// The field is an uncontrolled, externally-mutable resource: implementations
/// must read the *live* state on every call (no caching), and callers must
/// treat every returned value as already potentially stale.
///
/// Write methods return `false` when the platform rejects the operation
/// (read-only field, focus lost, no accessibility permission).
pub trait FieldAccessor: Send + Sync {
    /// Full current value of the focused field, if one is focused.
    fn current_text(&self) -> Option<String>;

    /// Currently selected text, if any.
    fn selected_text(&self) -> Option<String>;

    /// Current selection range, if any.
    fn selected_range(&self) -> Option<FieldRange>;

    /// Structurally set the field's full value.
    fn set_value(&self, text: &str) -> bool;

    /// Replace the current selection with `text`.
    fn set_selected_text(&self, text: &str) -> bool;

    /// Select the field's entire contents.
    fn select_all(&self) -> bool;
}

// ---------------------------------------------------------------------------
// NullFieldAccessor
// ---------------------------------------------------------------------------

/// Stand-in accessor for platforms without an accessibility backend.
///
/// Reads return `None` and writes fail, so the orchestrator logs a
/// reconciliation miss instead of corrupting anything.
pub struct NullFieldAccessor;

impl FieldAccessor for NullFieldAccessor {
    fn current_text(&self) -> Option<String> {
        None
    }

    fn selected_text(&self) -> Option<String> {
        None
    }

    fn selected_range(&self) -> Option<FieldRange> {
        None
    }

    fn set_value(&self, _text: &str) -> bool {
        log::debug!("NullFieldAccessor: set_value ignored");
        false
    }

    fn set_selected_text(&self, _text: &str) -> bool {
        log::debug!("NullFieldAccessor: set_selected_text ignored");
        false
    }

    fn select_all(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// MockFieldAccessor  (test double)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockFieldAccessor;

#[cfg(test)]
mod mock {
    use std::sync::Mutex;

    use super::{FieldAccessor, FieldRange};

    #[derive(Default)]
    struct MockFieldState {
        value: Option<String>,
        selection: Option<FieldRange>,
        reject_set_value: bool,
        corrupt_set_value: bool,
        ignore_set_selected_text: bool,
        reject_select_all: bool,
        set_value_calls: usize,
        set_selected_calls: usize,
    }

    /// In-memory [`FieldAccessor`] for tests.
    ///
    /// Failure injection: `reject_set_value` makes `set_value` report
    /// failure; `corrupt_set_value` makes it report success while writing
    /// different content; `ignore_set_selected_text` makes the selection
    /// write report success without mutating anything (both exercise
    /// read-back verification).
    pub struct MockFieldAccessor {
        inner: Mutex<MockFieldState>,
    }

    impl MockFieldAccessor {
        pub fn new(value: &str) -> Self {
            Self {
                inner: Mutex::new(MockFieldState {
                    value: Some(value.to_string()),
                    ..MockFieldState::default()
                }),
            }
        }

        pub fn unfocused() -> Self {
            Self {
                inner: Mutex::new(MockFieldState::default()),
            }
        }

        pub fn value(&self) -> Option<String> {
            self.inner.lock().unwrap().value.clone()
        }

        pub fn select(&self, range: FieldRange) {
            self.inner.lock().unwrap().selection = Some(range);
        }

        pub fn clear_selection(&self) {
            self.inner.lock().unwrap().selection = None;
        }

        pub fn reject_set_value(&self) {
            self.inner.lock().unwrap().reject_set_value = true;
        }

        pub fn corrupt_set_value(&self) {
            self.inner.lock().unwrap().corrupt_set_value = true;
        }

        pub fn ignore_set_selected_text(&self) {
            self.inner.lock().unwrap().ignore_set_selected_text = true;
        }

        pub fn reject_select_all(&self) {
            self.inner.lock().unwrap().reject_select_all = true;
        }

        pub fn set_value_calls(&self) -> usize {
            self.inner.lock().unwrap().set_value_calls
        }

        pub fn set_selected_calls(&self) -> usize {
            self.inner.lock().unwrap().set_selected_calls
        }

        /// Overwrite the field out-of-band, as the user would.
        pub fn type_externally(&self, value: &str) {
            self.inner.lock().unwrap().value = Some(value.to_string());
        }
    }

    impl FieldAccessor for MockFieldAccessor {
        fn current_text(&self) -> Option<String> {
            self.inner.lock().unwrap().value.clone()
        }

        fn selected_text(&self) -> Option<String> {
            let st = self.inner.lock().unwrap();
            let value = st.value.as_ref()?;
            let range = st.selection.as_ref()?;
            Some(
                value
                    .chars()
                    .skip(range.location)
                    .take(range.length)
                    .collect(),
            )
        }

        fn selected_range(&self) -> Option<FieldRange> {
            self.inner.lock().unwrap().selection.clone()
        }

        fn set_value(&self, text: &str) -> bool {
            let mut st = self.inner.lock().unwrap();
            st.set_value_calls += 1;
            if st.reject_set_value {
                return false;
            }
            if st.corrupt_set_value {
                st.value = Some(format!("{text}<garbled>"));
            } else {
                st.value = Some(text.to_string());
            }
            st.selection = None;
            true
        }

        fn set_selected_text(&self, text: &str) -> bool {
            let mut st = self.inner.lock().unwrap();
            st.set_selected_calls += 1;
            if st.ignore_set_selected_text {
                // Reports success, writes nothing.
                return true;
            }
            let Some(range) = st.selection.clone() else {
                return false;
            };
            let Some(value) = st.value.clone() else {
                return false;
            };
            let chars: Vec<char> = value.chars().collect();
            if range.location > chars.len() {
                return false;
            }
            let end = (range.location + range.length).min(chars.len());
            let mut new_value: String = chars[..range.location].iter().collect();
            new_value.push_str(text);
            new_value.extend(&chars[end..]);
            st.value = Some(new_value);
            st.selection = None;
            true
        }

        fn select_all(&self) -> bool {
            let mut st = self.inner.lock().unwrap();
            if st.reject_select_all {
                return false;
            }
            let Some(value) = st.value.as_ref() else {
                return false;
            };
            let len = value.chars().count();
            st.selection = Some(FieldRange::new(0, len));
            true
        }
    }
}
