//! Scripted driver for tests.

use super::InputDriver;
use crate::error::{DriverError, DriverResult};
use crate::executor::StopToken;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Click(i32, i32),
    Press(String),
    Hotkey(Vec<String>),
    Type(String),
    SetClipboard(String),
    Sleep(Duration),
    Focus(String),
}

impl Call {
    pub fn is_sleep(&self) -> bool {
        matches!(self, Call::Sleep(_))
    }
}

type Trigger = Box<dyn Fn(&Call) -> bool + Send>;

pub struct FakeDriver {
    pub calls: Vec<Call>,
    pub clipboard: String,
    /// What `focus_window` answers.
    pub focus_result: bool,
    /// Primitive name ("click", "press", ...) that fails with an input error.
    pub fail_on: Option<&'static str>,
    /// Pointer parked in a corner: every input primitive reports the fail-safe.
    pub fail_safe: bool,
    /// Pretend to be the target app: pressing enter writes a file at the
    /// path currently on the clipboard.
    pub write_on_enter: bool,
    /// Actually sleep instead of only recording.
    pub real_time: bool,
    /// Records whether this path existed when the first call arrived.
    pub watch: Option<PathBuf>,
    pub watch_existed_at_first_call: Option<bool>,
    pub stop_trigger: Option<(Trigger, StopToken)>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            clipboard: String::new(),
            focus_result: true,
            fail_on: None,
            fail_safe: false,
            write_on_enter: false,
            real_time: false,
            watch: None,
            watch_existed_at_first_call: None,
            stop_trigger: None,
        }
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `token` the first time a call matching `trigger` is made.
    pub fn stop_when(
        mut self,
        token: StopToken,
        trigger: impl Fn(&Call) -> bool + Send + 'static,
    ) -> Self {
        self.stop_trigger = Some((Box::new(trigger), token));
        self
    }

    /// Calls other than sleeps.
    pub fn actions(&self) -> Vec<Call> {
        self.calls.iter().filter(|c| !c.is_sleep()).cloned().collect()
    }

    fn record(&mut self, name: &'static str, call: Call) -> DriverResult<()> {
        if self.calls.is_empty() {
            if let Some(path) = &self.watch {
                self.watch_existed_at_first_call = Some(path.exists());
            }
        }
        if let Some((trigger, token)) = &self.stop_trigger {
            if trigger(&call) {
                token.stop();
            }
        }
        self.calls.push(call);
        if self.fail_safe && name != "sleep" {
            return Err(DriverError::FailSafe);
        }
        if self.fail_on == Some(name) {
            return Err(DriverError::Input(format!("{} rejected", name)));
        }
        Ok(())
    }
}

impl InputDriver for FakeDriver {
    fn move_click(&mut self, x: i32, y: i32) -> DriverResult<()> {
        self.record("click", Call::Click(x, y))
    }

    fn press(&mut self, key: &str) -> DriverResult<()> {
        self.record("press", Call::Press(key.to_string()))?;
        if self.write_on_enter && key == "enter" && !self.clipboard.is_empty() {
            let path = PathBuf::from(&self.clipboard);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DriverError::Input(e.to_string()))?;
            }
            std::fs::write(&path, b"ID3").map_err(|e| DriverError::Input(e.to_string()))?;
        }
        Ok(())
    }

    fn hotkey(&mut self, keys: &[&str]) -> DriverResult<()> {
        let keys = keys.iter().map(|k| k.to_string()).collect();
        self.record("hotkey", Call::Hotkey(keys))
    }

    fn type_text(&mut self, text: &str) -> DriverResult<()> {
        self.record("type", Call::Type(text.to_string()))
    }

    fn get_clipboard(&mut self) -> DriverResult<String> {
        if self.fail_on == Some("get_clipboard") {
            return Err(DriverError::Clipboard("get_clipboard rejected".into()));
        }
        Ok(self.clipboard.clone())
    }

    fn set_clipboard(&mut self, text: &str) -> DriverResult<()> {
        self.record("set_clipboard", Call::SetClipboard(text.to_string()))?;
        self.clipboard = text.to_string();
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        let _ = self.record("sleep", Call::Sleep(duration));
        if self.real_time {
            thread::sleep(duration);
        }
    }

    fn focus_window(&mut self, title: &str) -> DriverResult<bool> {
        self.record("focus", Call::Focus(title.to_string()))?;
        Ok(self.focus_result)
    }
}
