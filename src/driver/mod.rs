//! Input driver boundary.
//!
//! The executor never touches the OS directly; everything it does to the
//! desktop goes through [`InputDriver`]. [`EnigoDriver`] is the real
//! implementation, tests use a scripted double.

pub mod automation;
pub mod window;

#[cfg(test)]
pub(crate) mod mock;

pub use automation::{EnigoDriver, string_to_key};
pub use window::probe_dpi_scale;

use crate::error::DriverResult;
use std::time::Duration;

/// Primitive desktop capabilities. Every call may fail.
pub trait InputDriver {
    /// Move the pointer to physical screen coordinates and left-click.
    fn move_click(&mut self, x: i32, y: i32) -> DriverResult<()>;
    /// Press and release a single named key.
    fn press(&mut self, key: &str) -> DriverResult<()>;
    /// Hold `keys` in order, then release them in reverse.
    fn hotkey(&mut self, keys: &[&str]) -> DriverResult<()>;
    /// Enter literal text.
    fn type_text(&mut self, text: &str) -> DriverResult<()>;
    fn get_clipboard(&mut self) -> DriverResult<String>;
    fn set_clipboard(&mut self, text: &str) -> DriverResult<()>;
    fn sleep(&mut self, duration: Duration);
    /// Bring the window whose title contains `title` to the foreground.
    /// `Ok(false)` means no such window could be focused.
    fn focus_window(&mut self, title: &str) -> DriverResult<bool>;
}

/// Primary shortcut modifier for paste, select-all and save.
pub const PRIMARY_MODIFIER: &str = if cfg!(target_os = "macos") {
    "cmd"
} else {
    "ctrl"
};
