//! Desktop input automation.
//!
//! Provides keyboard, mouse and clipboard access using the enigo and arboard crates.

use super::InputDriver;
use super::window;
use crate::config::{GenerationConfig, seconds};
use crate::error::{DriverError, DriverResult};
use arboard::Clipboard;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use std::thread;
use std::time::Duration;

/// Convert a string key name to an enigo Key variant.
///
/// Supports:
/// - Modifier keys: shift, control/ctrl, alt/option, meta/command/cmd/win
/// - Function keys: f1-f12
/// - Navigation keys: arrows, home, end, pageup, pagedown
/// - Special keys: enter, escape, tab, backspace, delete, space, capslock
/// - Single characters: converted to Unicode key
pub fn string_to_key(key_str: &str) -> Option<Key> {
    match key_str.to_lowercase().as_str() {
        // Modifier keys
        "shift" | "lshift" => Some(Key::Shift),
        "control" | "ctrl" | "lcontrol" => Some(Key::Control),
        "alt" | "option" | "lalt" => Some(Key::Alt),
        "meta" | "command" | "cmd" | "win" | "super" => Some(Key::Meta),

        // Function keys
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

        // Navigation keys
        "up" | "uparrow" => Some(Key::UpArrow),
        "down" | "downarrow" => Some(Key::DownArrow),
        "left" | "leftarrow" => Some(Key::LeftArrow),
        "right" | "rightarrow" => Some(Key::RightArrow),
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        "pageup" | "pgup" => Some(Key::PageUp),
        "pagedown" | "pgdn" => Some(Key::PageDown),

        // Special keys
        "return" | "enter" => Some(Key::Return),
        "escape" | "esc" => Some(Key::Escape),
        "tab" => Some(Key::Tab),
        "backspace" | "back" => Some(Key::Backspace),
        "delete" | "del" => Some(Key::Delete),
        "space" | " " => Some(Key::Space),
        "capslock" | "caps" => Some(Key::CapsLock),

        // Single character, counted in chars so "é" or "中" also map
        _ if key_str.chars().count() == 1 => key_str.chars().next().map(Key::Unicode),

        // Unknown key
        _ => None,
    }
}

fn parse_key(name: &str) -> DriverResult<Key> {
    string_to_key(name).ok_or_else(|| DriverError::UnknownKey(name.to_string()))
}

fn connect() -> DriverResult<Enigo> {
    Enigo::new(&Settings::default()).map_err(|e| DriverError::Connection(e.to_string()))
}

fn input_error(e: enigo::InputError) -> DriverError {
    DriverError::Input(e.to_string())
}

/// Whether `pos` is one of the four corners of a `width` x `height` display.
pub fn in_fail_safe_corner(pos: (i32, i32), (width, height): (i32, i32)) -> bool {
    let (x, y) = pos;
    let on_x_edge = x <= 0 || (width > 0 && x >= width - 1);
    let on_y_edge = y <= 0 || (height > 0 && y >= height - 1);
    on_x_edge && on_y_edge
}

/// Drives the real desktop.
pub struct EnigoDriver {
    clipboard: Option<Clipboard>,
    /// Pause after every input primitive so the target app can keep up.
    action_pause: Duration,
    /// Spacing between characters when typing literal text.
    type_interval: Duration,
    fail_safe: bool,
}

impl EnigoDriver {
    pub fn new(action_pause: Duration, type_interval: Duration) -> Self {
        Self {
            clipboard: None,
            action_pause,
            type_interval,
            fail_safe: true,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            fail_safe: config.fail_safe,
            ..Self::new(seconds(config.action_pause), seconds(config.type_interval))
        }
    }

    /// Connect, refusing to send input while the pointer is parked in a corner.
    fn connect(&self) -> DriverResult<Enigo> {
        let enigo = connect()?;
        if self.fail_safe {
            if let Ok(pos) = enigo.location() {
                let display = enigo.main_display().unwrap_or((0, 0));
                if in_fail_safe_corner(pos, display) {
                    log::warn!("Pointer at {:?}, fail-safe triggered", pos);
                    return Err(DriverError::FailSafe);
                }
            }
        }
        Ok(enigo)
    }

    fn clipboard(&mut self) -> DriverResult<&mut Clipboard> {
        // Kept alive for the whole run: on X11 the contents vanish with the owner.
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new().map_err(|e| DriverError::Clipboard(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| DriverError::Clipboard("clipboard unavailable".to_string()))
    }

    fn settle(&self) {
        if !self.action_pause.is_zero() {
            thread::sleep(self.action_pause);
        }
    }
}

impl InputDriver for EnigoDriver {
    fn move_click(&mut self, x: i32, y: i32) -> DriverResult<()> {
        let mut enigo = self.connect()?;
        enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(input_error)?;
        enigo
            .button(Button::Left, Direction::Click)
            .map_err(input_error)?;
        self.settle();
        Ok(())
    }

    fn press(&mut self, key: &str) -> DriverResult<()> {
        let key = parse_key(key)?;
        let mut enigo = self.connect()?;
        enigo.key(key, Direction::Click).map_err(input_error)?;
        self.settle();
        Ok(())
    }

    fn hotkey(&mut self, keys: &[&str]) -> DriverResult<()> {
        let keys = keys
            .iter()
            .map(|k| parse_key(k))
            .collect::<DriverResult<Vec<_>>>()?;
        let mut enigo = self.connect()?;

        let mut held = Vec::with_capacity(keys.len());
        let mut result = Ok(());
        for key in keys {
            if let Err(e) = enigo.key(key, Direction::Press) {
                result = Err(input_error(e));
                break;
            }
            held.push(key);
        }
        // Release whatever went down, even after a failed press.
        for key in held.into_iter().rev() {
            let _ = enigo.key(key, Direction::Release);
        }
        result?;
        self.settle();
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> DriverResult<()> {
        let mut enigo = self.connect()?;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            enigo
                .text(ch.encode_utf8(&mut buf))
                .map_err(input_error)?;
            if !self.type_interval.is_zero() {
                thread::sleep(self.type_interval);
            }
        }
        self.settle();
        Ok(())
    }

    fn get_clipboard(&mut self) -> DriverResult<String> {
        self.clipboard()?
            .get_text()
            .map_err(|e| DriverError::Clipboard(e.to_string()))
    }

    fn set_clipboard(&mut self, text: &str) -> DriverResult<()> {
        self.clipboard()?
            .set_text(text.to_string())
            .map_err(|e| DriverError::Clipboard(e.to_string()))
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn focus_window(&mut self, title: &str) -> DriverResult<bool> {
        window::activate_window(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_named_and_character_keys() {
        assert_eq!(string_to_key("Enter"), Some(Key::Return));
        assert_eq!(string_to_key("ctrl"), Some(Key::Control));
        assert_eq!(string_to_key("cmd"), Some(Key::Meta));
        assert_eq!(string_to_key("del"), Some(Key::Delete));
        assert_eq!(string_to_key("v"), Some(Key::Unicode('v')));
        assert_eq!(string_to_key("é"), Some(Key::Unicode('é')));
    }

    #[test]
    fn fail_safe_corners() {
        let display = (1920, 1080);
        assert!(in_fail_safe_corner((0, 0), display));
        assert!(in_fail_safe_corner((1919, 0), display));
        assert!(in_fail_safe_corner((0, 1079), display));
        assert!(in_fail_safe_corner((1919, 1079), display));
        assert!(!in_fail_safe_corner((0, 500), display));
        assert!(!in_fail_safe_corner((960, 540), display));
        // Unknown display size still guards the origin.
        assert!(in_fail_safe_corner((0, 0), (0, 0)));
        assert!(!in_fail_safe_corner((1919, 1079), (0, 0)));
    }

    #[test]
    fn unknown_key_names_are_errors() {
        assert!(string_to_key("hyper").is_none());
        assert!(matches!(parse_key("hyper"), Err(DriverError::UnknownKey(k)) if k == "hyper"));
    }
}
