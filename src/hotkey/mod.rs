//! Global hotkeys for drill navigation, backed by `rdev`.
//!
//! `rdev::listen()` blocks its thread forever, so [`HotkeyListener::start`]
//! runs it on a dedicated OS thread and forwards matching key presses as
//! [`NavCommand`]s over a tokio channel.  Dropping the listener stops the
//! forwarding; the thread itself lives until the process exits.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use ear_drill::config::HotkeyConfig;
//! use ear_drill::hotkey::{HotkeyBindings, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let bindings = HotkeyBindings::from_config(&HotkeyConfig::default());
//! let _listener = HotkeyListener::start(bindings, tx);
//!
//! // In your async loop:
//! // while let Some(cmd) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

use crate::config::HotkeyConfig;

// ---------------------------------------------------------------------------
// NavCommand
// ---------------------------------------------------------------------------

/// Commands the hotkeys map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    PlayPause,
    Previous,
    Next,
}

// ---------------------------------------------------------------------------
// HotkeyBindings
// ---------------------------------------------------------------------------

/// Resolved key for each [`NavCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBindings {
    pub play_pause: rdev::Key,
    pub previous: rdev::Key,
    pub next: rdev::Key,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            play_pause: rdev::Key::F8,
            previous: rdev::Key::F7,
            next: rdev::Key::F9,
        }
    }
}

impl HotkeyBindings {
    /// Resolve the configured key names.  Unknown names keep the default
    /// binding and log a warning.
    pub fn from_config(config: &HotkeyConfig) -> Self {
        let defaults = Self::default();
        let resolve = |name: &str, fallback: rdev::Key| {
            parse_key(name).unwrap_or_else(|| {
                log::warn!("unknown hotkey {name:?}; using {fallback:?}");
                fallback
            })
        };
        Self {
            play_pause: resolve(&config.play_pause, defaults.play_pause),
            previous: resolve(&config.previous, defaults.previous),
            next: resolve(&config.next, defaults.next),
        }
    }

    /// The command bound to `key`, if any.
    pub fn command_for(&self, key: rdev::Key) -> Option<NavCommand> {
        if key == self.play_pause {
            Some(NavCommand::PlayPause)
        } else if key == self.previous {
            Some(NavCommand::Previous)
        } else if key == self.next {
            Some(NavCommand::Next)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

const FUNCTION_KEYS: [rdev::Key; 12] = [
    rdev::Key::F1,
    rdev::Key::F2,
    rdev::Key::F3,
    rdev::Key::F4,
    rdev::Key::F5,
    rdev::Key::F6,
    rdev::Key::F7,
    rdev::Key::F8,
    rdev::Key::F9,
    rdev::Key::F10,
    rdev::Key::F11,
    rdev::Key::F12,
];

const LETTER_KEYS: [rdev::Key; 26] = [
    rdev::Key::KeyA,
    rdev::Key::KeyB,
    rdev::Key::KeyC,
    rdev::Key::KeyD,
    rdev::Key::KeyE,
    rdev::Key::KeyF,
    rdev::Key::KeyG,
    rdev::Key::KeyH,
    rdev::Key::KeyI,
    rdev::Key::KeyJ,
    rdev::Key::KeyK,
    rdev::Key::KeyL,
    rdev::Key::KeyM,
    rdev::Key::KeyN,
    rdev::Key::KeyO,
    rdev::Key::KeyP,
    rdev::Key::KeyQ,
    rdev::Key::KeyR,
    rdev::Key::KeyS,
    rdev::Key::KeyT,
    rdev::Key::KeyU,
    rdev::Key::KeyV,
    rdev::Key::KeyW,
    rdev::Key::KeyX,
    rdev::Key::KeyY,
    rdev::Key::KeyZ,
];

/// Parse a key name from the config into an [`rdev::Key`].
///
/// Accepts `F1`–`F12`, single letters, and the navigation keys a media-style
/// control would use.  Matching ignores case.
///
/// ```
/// use ear_drill::hotkey::parse_key;
///
/// assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
/// assert_eq!(parse_key("space"), Some(rdev::Key::Space));
/// assert_eq!(parse_key("n"), Some(rdev::Key::KeyN));
/// assert_eq!(parse_key("Ctrl+N"), None);
/// ```
pub fn parse_key(name: &str) -> Option<rdev::Key> {
    let name = name.trim().to_ascii_lowercase();

    if let Some(number) = name.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return number
            .checked_sub(1)
            .and_then(|i| FUNCTION_KEYS.get(i))
            .copied();
    }

    if let [letter @ b'a'..=b'z'] = name.as_bytes() {
        return Some(LETTER_KEYS[usize::from(letter - b'a')]);
    }

    let key = match name.as_str() {
        "space" => rdev::Key::Space,
        "escape" | "esc" => rdev::Key::Escape,
        "return" | "enter" => rdev::Key::Return,
        "tab" => rdev::Key::Tab,
        "left" | "leftarrow" => rdev::Key::LeftArrow,
        "right" | "rightarrow" => rdev::Key::RightArrow,
        "up" | "uparrow" => rdev::Key::UpArrow,
        "down" | "downarrow" => rdev::Key::DownArrow,
        "pageup" => rdev::Key::PageUp,
        "pagedown" => rdev::Key::PageDown,
        "home" => rdev::Key::Home,
        "end" => rdev::Key::End,
        "pause" => rdev::Key::Pause,
        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_keys() {
        assert_eq!(parse_key("F1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("f12"), Some(rdev::Key::F12));
        assert_eq!(parse_key("F0"), None);
        assert_eq!(parse_key("F13"), None);
    }

    #[test]
    fn letters_ignore_case() {
        assert_eq!(parse_key("A"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("z"), Some(rdev::Key::KeyZ));
        // A lone "f" is a letter, not a function key.
        assert_eq!(parse_key("F"), Some(rdev::Key::KeyF));
    }

    #[test]
    fn named_keys() {
        assert_eq!(parse_key("Space"), Some(rdev::Key::Space));
        assert_eq!(parse_key("Esc"), Some(rdev::Key::Escape));
        assert_eq!(parse_key("Right"), Some(rdev::Key::RightArrow));
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("xyz"), None);
    }

    #[test]
    fn default_config_binds_media_row() {
        let bindings = HotkeyBindings::from_config(&HotkeyConfig::default());
        assert_eq!(bindings, HotkeyBindings::default());
        assert_eq!(bindings.command_for(rdev::Key::F8), Some(NavCommand::PlayPause));
        assert_eq!(bindings.command_for(rdev::Key::F7), Some(NavCommand::Previous));
        assert_eq!(bindings.command_for(rdev::Key::F9), Some(NavCommand::Next));
        assert_eq!(bindings.command_for(rdev::Key::KeyQ), None);
    }

    #[test]
    fn unknown_key_keeps_default_binding() {
        let config = HotkeyConfig {
            next: "Hyper+N".into(),
            previous: "p".into(),
            ..HotkeyConfig::default()
        };
        let bindings = HotkeyBindings::from_config(&config);
        assert_eq!(bindings.next, rdev::Key::F9);
        assert_eq!(bindings.previous, rdev::Key::KeyP);
    }
}
