//! Step interpreter.
//!
//! Dispatches one [`StepSpec`] against the item's context. Driver faults are
//! caught here and reported as `"<description>: <error>"`; nothing raw
//! escapes a step.

use super::save::SaveTrigger;
use super::{Engine, ExecutionContext, RunEvent, StepFault};
use crate::config::seconds;
use crate::driver::{InputDriver, PRIMARY_MODIFIER};
use crate::error::StepError;
use crate::step_types::{Condition, SaveMethod, StepKind, StepSpec};

const CLIPBOARD_SETTLE: f64 = 0.2;
const PASTE_SETTLE: f64 = 0.5;
const FOCUS_SETTLE: f64 = 1.0;
const DEFAULT_WAIT_AFTER: f64 = 0.5;
const EDIT_WAIT_AFTER: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    /// A `skip_if_exists` conditional found the target and ran nothing.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    Focused,
    /// Focus failed; the operator was given time to switch manually.
    FailedFallbackToManual,
}

impl<D: InputDriver> Engine<D> {
    /// Execute one step. Checks for a stop request first.
    pub fn execute(
        &mut self,
        step: &StepSpec,
        ctx: &mut ExecutionContext,
    ) -> Result<StepStatus, StepError> {
        if self.is_stopped() {
            return Err(StepError::Interrupted);
        }
        log::debug!("[{}] {}", step.kind.name(), step.description);
        self.emit(RunEvent::StepStarted(step.description.clone()));

        match self.run_step(step, ctx) {
            Ok(status) => Ok(status),
            Err(StepFault::Step(e)) => Err(e),
            Err(StepFault::Driver(e)) => {
                log::error!("[{}] {}", step.description, e);
                Err(StepError::Failed(format!("{}: {}", step.description, e)))
            }
        }
    }

    fn run_step(
        &mut self,
        step: &StepSpec,
        ctx: &mut ExecutionContext,
    ) -> Result<StepStatus, StepFault> {
        let label = &step.description;
        match &step.kind {
            StepKind::GenerateText => {
                if !ctx.generate_text() {
                    return Err(StepError::failed("name or english name is empty").into());
                }
                log::info!("[{}] generated text: {}", label, ctx.generated_text);
            }
            StepKind::CopyToClipboard => {
                if ctx.generated_text.is_empty() {
                    return Err(StepError::failed("no generated text to copy").into());
                }
                let text = ctx.generated_text.clone();
                self.driver.set_clipboard(&text)?;
                self.pause_secs(CLIPBOARD_SETTLE)?;
                log::info!("[{}] copied to clipboard", label);
            }
            StepKind::CopyIdToClipboard => {
                let Some(id) = ctx.item_id else {
                    return Err(StepError::failed("no item id to copy").into());
                };
                self.driver.set_clipboard(&id.to_string())?;
                self.pause_secs(CLIPBOARD_SETTLE)?;
                log::info!("[{}] copied id {} to clipboard", label, id);
            }
            StepKind::ActivateWindow => {
                let outcome = self.activate_window();
                log::info!("[{}] {:?}", label, outcome);
            }
            StepKind::Click(params) => {
                let Some([x, y]) = params.position else {
                    return Err(
                        StepError::failed(format!("click position not configured: {}", label))
                            .into(),
                    );
                };
                let (px, py) = self.coords.adjust(x, y);
                self.driver.move_click(px, py)?;
                self.pause_secs(params.wait_after.unwrap_or(DEFAULT_WAIT_AFTER))?;
                log::info!("[{}] clicked ({}, {}) -> ({}, {})", label, x, y, px, py);
            }
            StepKind::Paste(params) => {
                self.driver.hotkey(&[PRIMARY_MODIFIER, "v"])?;
                self.pause_secs(PASTE_SETTLE)?;
                self.pause_secs(params.wait_after.unwrap_or(DEFAULT_WAIT_AFTER))?;
                log::info!("[{}] pasted", label);
            }
            StepKind::SelectAll(params) => {
                self.driver.hotkey(&[PRIMARY_MODIFIER, "a"])?;
                self.pause_secs(params.wait_after.unwrap_or(EDIT_WAIT_AFTER))?;
            }
            StepKind::Delete(params) => {
                self.driver.press("delete")?;
                self.pause_secs(params.wait_after.unwrap_or(EDIT_WAIT_AFTER))?;
            }
            StepKind::Wait(params) => {
                log::info!("[{}] waiting {}s", label, params.duration);
                self.pause(seconds(params.duration))?;
            }
            StepKind::Hotkey(params) => {
                if params.keys.is_empty() {
                    return Err(StepError::failed("hotkey keys not configured").into());
                }
                let keys: Vec<&str> = params.keys.iter().map(String::as_str).collect();
                self.driver.hotkey(&keys)?;
                self.pause_secs(params.wait_after.unwrap_or(DEFAULT_WAIT_AFTER))?;
                log::info!("[{}] pressed {}", label, params.keys.join("+"));
            }
            StepKind::Type(params) => {
                let text = match params.text.as_deref() {
                    Some(text) if !text.is_empty() => text.to_string(),
                    _ => ctx.generated_text.clone(),
                };
                if text.is_empty() {
                    return Err(StepError::failed("no text to type").into());
                }
                self.driver.type_text(&text)?;
                self.pause_secs(params.wait_after.unwrap_or(DEFAULT_WAIT_AFTER))?;
            }
            StepKind::Press(params) => {
                let key = match params.key.as_deref() {
                    Some(key) if !key.is_empty() => key,
                    _ => return Err(StepError::failed("key not configured").into()),
                };
                self.driver.press(key)?;
                self.pause_secs(params.wait_after.unwrap_or(DEFAULT_WAIT_AFTER))?;
                log::info!("[{}] pressed {}", label, key);
            }
            StepKind::SaveFile(params) => {
                if ctx.audio_path.is_empty() {
                    return Err(StepError::failed("audio path is empty").into());
                }
                let trigger = match params.method.unwrap_or(SaveMethod::Dialog) {
                    SaveMethod::Button => {
                        match params.button_position.or(self.config.save_button_position) {
                            Some(position) => SaveTrigger::Button(position),
                            None => {
                                return Err(StepError::failed(
                                    "save button position not configured",
                                )
                                .into());
                            }
                        }
                    }
                    SaveMethod::Hotkey => SaveTrigger::Hotkey,
                    SaveMethod::Dialog => SaveTrigger::Dialog,
                };
                let settle = seconds(
                    params
                        .wait_after
                        .unwrap_or(self.config.wait_time_after_save),
                );
                let target = self.target_path(&ctx.audio_path);
                if !self.save(&target, trigger, settle)? {
                    return Err(StepError::failed(format!(
                        "file not saved or path incorrect: {}",
                        target.display()
                    ))
                    .into());
                }
            }
            StepKind::Conditional(params) => {
                if params.condition == Condition::SkipIfExists
                    && !ctx.audio_path.is_empty()
                    && self.target_path(&ctx.audio_path).exists()
                {
                    log::info!("[{}] skipped: file already exists", label);
                    return Ok(StepStatus::Skipped);
                }
                for sub_step in &params.steps {
                    self.execute(sub_step, ctx)?;
                }
            }
        }
        Ok(StepStatus::Done)
    }

    /// Try to focus the target window; on failure give the operator time to
    /// switch by hand. Never fails; a stop only cuts the wait short, so
    /// callers must check for it before sending more input.
    pub fn activate_window(&mut self) -> FocusOutcome {
        let title = self.config.app_window_title.clone();
        let outcome = if title.is_empty() {
            log::warn!("app_window_title is not configured");
            FocusOutcome::FailedFallbackToManual
        } else {
            match self.driver.focus_window(&title) {
                Ok(true) => FocusOutcome::Focused,
                Ok(false) => {
                    log::warn!("Could not find window '{}'", title);
                    FocusOutcome::FailedFallbackToManual
                }
                Err(e) => {
                    log::warn!("Could not focus window '{}': {}", title, e);
                    FocusOutcome::FailedFallbackToManual
                }
            }
        };

        match outcome {
            FocusOutcome::Focused => self.settle(seconds(FOCUS_SETTLE)),
            FocusOutcome::FailedFallbackToManual => {
                let delay = self.config.manual_focus_delay;
                log::warn!(
                    "Switch to the target application manually, continuing in {}s",
                    delay
                );
                self.settle(seconds(delay));
            }
        }
        self.emit(RunEvent::WindowFocus(outcome));
        outcome
    }
}
