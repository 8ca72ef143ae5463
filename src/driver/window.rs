//! Window focus and display probing.

use crate::error::{DriverError, DriverResult};
use std::process::Command;

/// Display scale of the primary monitor (1.0 = 96 DPI).
///
/// Falls back to 1.0 whenever the display subsystem cannot answer.
pub fn probe_dpi_scale() -> f64 {
    let monitors = match xcap::Monitor::all() {
        Ok(monitors) => monitors,
        Err(e) => {
            log::warn!("DPI probe: cannot list monitors ({}), assuming 1.0", e);
            return 1.0;
        }
    };
    let primary = monitors
        .iter()
        .find(|m| m.is_primary().unwrap_or(false))
        .or_else(|| monitors.first());
    match primary.map(|m| m.scale_factor()) {
        Some(Ok(scale)) if scale.is_finite() && scale > 0.0 => f64::from(scale),
        Some(Ok(scale)) => {
            log::warn!("DPI probe: ignoring scale factor {}, assuming 1.0", scale);
            1.0
        }
        Some(Err(e)) => {
            log::warn!("DPI probe: {}, assuming 1.0", e);
            1.0
        }
        None => 1.0,
    }
}

/// Whether any top-level window title contains `title`.
fn window_exists(title: &str) -> DriverResult<bool> {
    let windows = xcap::Window::all().map_err(|e| DriverError::Window(e.to_string()))?;
    Ok(windows
        .iter()
        .any(|w| w.title().map(|t| t.contains(title)).unwrap_or(false)))
}

/// Focus the first window whose title contains `title`.
pub fn activate_window(title: &str) -> DriverResult<bool> {
    if !window_exists(title)? {
        log::debug!("No window titled '{}'", title);
        return Ok(false);
    }
    raise(title)
}

#[cfg(target_os = "windows")]
fn raise(title: &str) -> DriverResult<bool> {
    let script = format!(
        "(New-Object -ComObject WScript.Shell).AppActivate('{}')",
        title.replace('\'', "''")
    );
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .output()
        .map_err(|e| DriverError::Window(e.to_string()))?;
    Ok(String::from_utf8_lossy(&output.stdout).trim() == "True")
}

#[cfg(target_os = "macos")]
fn raise(title: &str) -> DriverResult<bool> {
    let escaped = title.replace('\\', "\\\\").replace('"', "\\\"");
    let script = format!(
        "tell application \"System Events\" to set frontmost of (first process whose \
         (name of every window) contains \"{}\") to true",
        escaped
    );
    let status = Command::new("osascript")
        .args(["-e", &script])
        .status()
        .map_err(|e| DriverError::Window(e.to_string()))?;
    Ok(status.success())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn raise(title: &str) -> DriverResult<bool> {
    match Command::new("wmctrl").args(["-a", title]).status() {
        Ok(status) => Ok(status.success()),
        // wmctrl missing, try xdotool.
        Err(_) => {
            let status = Command::new("xdotool")
                .args(["search", "--name", title, "windowactivate"])
                .status()
                .map_err(|e| DriverError::Window(e.to_string()))?;
            Ok(status.success())
        }
    }
}
