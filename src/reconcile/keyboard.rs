//! Key-event synthesis backed by the `enigo` crate.
//!
//! Used only by the last-resort clipboard-paste apply strategy.  A new
//! [`Enigo`] instance is created per call because `Enigo` is not `Send` and
//! the handle is cheap to construct.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::ApplyError;

/// Simulate the system paste shortcut in the currently focused window.
///
/// * **macOS** → Meta (⌘) + V
/// * **Windows / Linux** → Ctrl + V
pub fn simulate_paste() -> Result<(), ApplyError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| ApplyError::KeySimulation(e.to_string()))?;

    #[cfg(target_os = "macos")]
    let modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let modifier = Key::Control;

    enigo
        .key(modifier, Direction::Press)
        .map_err(|e| ApplyError::KeySimulation(e.to_string()))?;
    enigo
        .key(Key::Unicode('v'), Direction::Click)
        .map_err(|e| ApplyError::KeySimulation(e.to_string()))?;
    enigo
        .key(modifier, Direction::Release)
        .map_err(|e| ApplyError::KeySimulation(e.to_string()))
}
