//! Global stop hotkey.
//!
//! Listens for a key anywhere on the desktop and sets the run's
//! [`StopToken`]; the engine finishes its current step and winds down.

use crate::executor::StopToken;
use rdev::{EventType, Key, listen};
use std::thread;

/// Resolve a configured key name. Only keys that are unlikely to be sent to
/// the target app are accepted.
pub fn parse_stop_key(name: &str) -> Option<Key> {
    match name.to_lowercase().as_str() {
        "f1" => Some(Key::F1),
        "f2" => Some(Key::F2),
        "f3" => Some(Key::F3),
        "f4" => Some(Key::F4),
        "f5" => Some(Key::F5),
        "f6" => Some(Key::F6),
        "f7" => Some(Key::F7),
        "f8" => Some(Key::F8),
        "f9" => Some(Key::F9),
        "f10" => Some(Key::F10),
        "f11" => Some(Key::F11),
        "f12" => Some(Key::F12),
        "pause" => Some(Key::Pause),
        "scrolllock" => Some(Key::ScrollLock),
        _ => None,
    }
}

/// Spawn a background listener. Failure to hook the keyboard is logged and
/// otherwise ignored; the run just has no hotkey.
pub fn spawn_stop_listener(key: Key, token: StopToken) {
    thread::spawn(move || {
        if let Err(error) = listen(move |event| {
            if let EventType::KeyPress(pressed) = event.event_type {
                if pressed == key && !token.is_stopped() {
                    log::warn!("Stop hotkey pressed, stopping after the current step");
                    token.stop();
                }
            }
        }) {
            log::warn!("Stop hotkey listener unavailable: {:?}", error);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_keys_case_insensitively() {
        assert_eq!(parse_stop_key("F3"), Some(Key::F3));
        assert_eq!(parse_stop_key("pause"), Some(Key::Pause));
    }

    #[test]
    fn rejects_keys_used_for_typing() {
        assert_eq!(parse_stop_key("a"), None);
        assert_eq!(parse_stop_key("enter"), None);
    }
}
