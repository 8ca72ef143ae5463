//! Save dialog handling.
//!
//! The target application gives no success signal, so a save counts as done
//! only when the file shows up on disk. A stop request aborts the sequence
//! before the next keystroke. After the settle wait the path is
//! polled every 100ms for up to `save_verify_timeout`. Worst case a save takes
//! `DIALOG_OPEN + 0.2 + 0.2 + 0.5 + settle + save_verify_timeout` seconds.

use super::{Engine, StepFault};
use crate::config::seconds;
use crate::driver::{InputDriver, PRIMARY_MODIFIER};
use crate::step_types::Position;
use std::path::Path;
use std::time::Duration;

const DIALOG_OPEN: f64 = 1.0;
const SELECT_SETTLE: f64 = 0.2;
const CLIPBOARD_SETTLE: f64 = 0.2;
const PASTE_SETTLE: f64 = 0.5;
const VERIFY_INTERVAL: Duration = Duration::from_millis(100);

/// How the save dialog gets opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SaveTrigger {
    /// Click the save button at this logical position.
    Button(Position),
    /// Platform save shortcut.
    Hotkey,
    /// Already open.
    Dialog,
}

impl<D: InputDriver> Engine<D> {
    /// Drive the save dialog to write `target`, then confirm it exists.
    ///
    /// Returns `Ok(false)` when the file did not appear. Driver faults and a
    /// stop request abort the sequence and are passed to the caller.
    pub(crate) fn save(
        &mut self,
        target: &Path,
        trigger: SaveTrigger,
        settle: Duration,
    ) -> Result<bool, StepFault> {
        if let Some(parent) = target.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Cannot create {}: {}", parent.display(), e);
                return Ok(false);
            }
        }
        if target.exists() {
            log::info!("File exists and will be overwritten: {}", target.display());
        }

        match trigger {
            SaveTrigger::Button([x, y]) => {
                let (px, py) = self.coords.adjust(x, y);
                self.driver.move_click(px, py)?;
                self.pause_secs(DIALOG_OPEN)?;
            }
            SaveTrigger::Hotkey => {
                self.driver.hotkey(&[PRIMARY_MODIFIER, "s"])?;
                self.pause_secs(DIALOG_OPEN)?;
            }
            SaveTrigger::Dialog => {}
        }

        self.driver.hotkey(&[PRIMARY_MODIFIER, "a"])?;
        self.pause_secs(SELECT_SETTLE)?;

        let full_path = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());
        self.driver
            .set_clipboard(&full_path.to_string_lossy())?;
        self.pause_secs(CLIPBOARD_SETTLE)?;
        self.driver.hotkey(&[PRIMARY_MODIFIER, "v"])?;
        self.pause_secs(PASTE_SETTLE)?;

        self.driver.press("enter")?;
        self.pause(settle)?;

        if self.wait_for_file(target) {
            log::info!("Saved {}", target.display());
            Ok(true)
        } else {
            log::warn!(
                "File not found after save: {} (check the app's save behaviour)",
                target.display()
            );
            Ok(false)
        }
    }

    fn wait_for_file(&mut self, target: &Path) -> bool {
        let timeout = seconds(self.config.save_verify_timeout);
        let attempts = timeout.as_millis().div_ceil(VERIFY_INTERVAL.as_millis());
        for _ in 0..attempts {
            if target.exists() {
                return true;
            }
            self.driver.sleep(VERIFY_INTERVAL);
        }
        target.exists()
    }
}
