//! Per-item processing: validation, skip rules, then the step sequence.

use super::save::SaveTrigger;
use super::{Engine, ExecutionContext, StepFault};
use crate::catalog::CatalogEntry;
use crate::config::seconds;
use crate::driver::{InputDriver, PRIMARY_MODIFIER};
use crate::error::StepError;
use crate::step_types::SaveMethod;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Completed,
    /// `skip_existing` is on and the target file was already there.
    Skipped,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Completed => write!(f, "success"),
            ItemStatus::Skipped => write!(f, "already exists, skipped"),
        }
    }
}

impl<D: InputDriver> Engine<D> {
    /// Process one catalog entry. `position` is 1-based within `total`.
    pub fn process(
        &mut self,
        entry: &CatalogEntry,
        position: usize,
        total: usize,
    ) -> Result<ItemStatus, StepError> {
        let ctx = ExecutionContext::for_entry(entry);
        log::info!(
            "[{}/{}] item ID {}: {} ({})",
            position,
            total,
            entry.label(),
            ctx.display_name,
            ctx.english_name
        );

        if ctx.display_name.is_empty() {
            return Err(StepError::failed("name is empty"));
        }
        if ctx.english_name.is_empty() {
            return Err(StepError::failed("english name is empty"));
        }
        if ctx.audio_path.is_empty() {
            return Err(StepError::failed("audio path is empty"));
        }

        if self.config.skip_existing && self.target_path(&ctx.audio_path).exists() {
            log::info!("  skipped: file already exists");
            return Ok(ItemStatus::Skipped);
        }

        if self.steps.is_empty() {
            log::warn!("No steps configured, using the built-in sequence");
            self.process_builtin(ctx)
        } else {
            self.process_steps(ctx)
        }
    }

    fn process_steps(&mut self, mut ctx: ExecutionContext) -> Result<ItemStatus, StepError> {
        let steps = Arc::clone(&self.steps);
        for step in steps.iter() {
            if self.is_stopped() {
                return Err(StepError::Interrupted);
            }
            self.execute(step, &mut ctx)?;
        }
        if self.is_stopped() {
            return Err(StepError::Interrupted);
        }
        Ok(ItemStatus::Completed)
    }

    /// Fixed sequence used when the config lists no steps.
    fn process_builtin(&mut self, mut ctx: ExecutionContext) -> Result<ItemStatus, StepError> {
        match self.run_builtin(&mut ctx) {
            Ok(()) if self.is_stopped() => Err(StepError::Interrupted),
            Ok(()) => Ok(ItemStatus::Completed),
            Err(StepFault::Step(e)) => Err(e),
            Err(StepFault::Driver(e)) => {
                Err(StepError::Failed(format!("processing failed: {}", e)))
            }
        }
    }

    fn run_builtin(&mut self, ctx: &mut ExecutionContext) -> Result<(), StepFault> {
        ctx.generate_text();
        log::info!("  generated text: {}", ctx.generated_text);
        self.driver.set_clipboard(&ctx.generated_text)?;
        self.pause_secs(0.2)?;

        self.activate_window();
        if self.is_stopped() {
            return Err(StepError::Interrupted.into());
        }

        if let Some([x, y]) = self.config.input_field_position {
            let (px, py) = self.coords.adjust(x, y);
            self.driver.move_click(px, py)?;
            self.pause_secs(0.3)?;
        }
        self.driver.hotkey(&[PRIMARY_MODIFIER, "v"])?;
        self.pause_secs(0.5)?;

        let Some([x, y]) = self.config.generate_button_position else {
            return Err(StepError::failed("generate button position not configured").into());
        };
        let (px, py) = self.coords.adjust(x, y);
        self.driver.move_click(px, py)?;
        self.pause_secs(0.5)?;

        let wait = self.config.wait_time_after_generate;
        log::info!("  waiting {}s for generation", wait);
        self.pause(seconds(wait))?;

        let trigger = match self.config.save_method {
            SaveMethod::Button => match self.config.save_button_position {
                Some(position) => SaveTrigger::Button(position),
                None => {
                    return Err(StepError::failed("save button position not configured").into());
                }
            },
            SaveMethod::Hotkey => SaveTrigger::Hotkey,
            SaveMethod::Dialog => SaveTrigger::Dialog,
        };
        let target = self.target_path(&ctx.audio_path);
        let settle = seconds(self.config.wait_time_after_save);
        if !self.save(&target, trigger, settle)? {
            return Err(StepError::failed("saving file failed").into());
        }
        Ok(())
    }
}
