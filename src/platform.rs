//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Modifier for the form shortcuts
/// - macOS: SUPER (Cmd key), Ctrl also accepted
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Whether `modifiers` hold the action modifier (or plain Ctrl)
pub fn is_action(modifiers: KeyModifiers) -> bool {
    modifiers.contains(ACTION_MODIFIER) || modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(target_os = "macos")]
pub const NEXT_SHORTCUT: &str = "Cmd+N";
#[cfg(not(target_os = "macos"))]
pub const NEXT_SHORTCUT: &str = "Ctrl+N";

#[cfg(target_os = "macos")]
pub const PREVIOUS_SHORTCUT: &str = "Cmd+P";
#[cfg(not(target_os = "macos"))]
pub const PREVIOUS_SHORTCUT: &str = "Ctrl+P";

/// Submit works as Ctrl+S on all platforms
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

#[cfg(target_os = "macos")]
pub const CLEAR_SIGNATURE_SHORTCUT: &str = "Cmd+L";
#[cfg(not(target_os = "macos"))]
pub const CLEAR_SIGNATURE_SHORTCUT: &str = "Ctrl+L";
