//! Clipboard save / restore helpers backed by the `arboard` crate.
//!
//! Each function opens a short-lived [`arboard::Clipboard`] handle rather
//! than sharing one across calls, because `arboard::Clipboard` is not `Send`
//! on all platforms and the handle is cheap to create.

use arboard::Clipboard;

use super::ApplyError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Capture the current clipboard plain-text content.
///
/// Returns `Ok(None)` when the clipboard is empty or holds non-text data —
/// that is not an error.
pub fn save_clipboard() -> Result<Option<String>, ApplyError> {
    let mut clipboard = open_clipboard()?;
    // get_text errors on empty or non-text content — both are None here
    Ok(clipboard.get_text().ok())
}

/// Write `text` into the system clipboard, replacing whatever was there.
pub fn set_clipboard(text: &str) -> Result<(), ApplyError> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text)
        .map_err(|e| ApplyError::Clipboard(e.to_string()))
}

/// Restore the clipboard to a previously saved value.
///
/// `None` means nothing was saved (the clipboard was empty or non-text
/// before the paste); the clipboard is left alone in that case.
pub fn restore_clipboard(saved: Option<String>) -> Result<(), ApplyError> {
    match saved {
        Some(text) => set_clipboard(&text),
        None => Ok(()),
    }
}

fn open_clipboard() -> Result<Clipboard, ApplyError> {
    Clipboard::new().map_err(|e| ApplyError::Clipboard(e.to_string()))
}
