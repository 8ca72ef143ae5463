//! # Automation Engine
//!
//! Runs the configured step sequence once per catalog item against the
//! target desktop application.
//!
//! ## Layers
//! - [`Engine::run`]: batch orchestration over a catalog slice
//! - [`Engine::process`]: validation, skip rules and the step sequence for one item
//! - [`Engine::execute`]: one step against the item's [`ExecutionContext`]
//! - [`Engine::save`]: save dialog handling plus on-disk verification
//!
//! Everything is strictly sequential. The only thing shared with other
//! threads is the [`StopToken`], checked before every step and at least every
//! 500ms inside waits.

mod batch;
mod context;
mod coordinates;
pub mod events;
mod interpreter;
mod processor;
mod save;
mod stop;

pub use batch::RunResult;
pub use context::{ExecutionContext, bilingual_phrase};
pub use coordinates::CoordinateTransformer;
pub use events::RunEvent;
pub use interpreter::{FocusOutcome, StepStatus};
pub use processor::ItemStatus;
pub use save::SaveTrigger;
pub use stop::StopToken;

use crate::config::{GenerationConfig, seconds};
use crate::driver::{InputDriver, probe_dpi_scale};
use crate::error::{DriverError, StepError};
use crate::step_types::StepSpec;
use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Longest uninterrupted sleep; stop requests are noticed within this.
pub const POLL_SLICE: Duration = Duration::from_millis(500);

/// Internal failure while running a step, before it is turned into a
/// [`StepError`] at the step boundary.
#[derive(Debug)]
pub(crate) enum StepFault {
    Step(StepError),
    Driver(DriverError),
}

impl From<StepError> for StepFault {
    fn from(e: StepError) -> Self {
        StepFault::Step(e)
    }
}

impl From<DriverError> for StepFault {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::FailSafe => StepFault::Step(StepError::Interrupted),
            e => StepFault::Driver(e),
        }
    }
}

pub struct Engine<D: InputDriver> {
    driver: D,
    config: GenerationConfig,
    steps: Arc<Vec<StepSpec>>,
    coords: CoordinateTransformer,
    base_dir: PathBuf,
    stop: StopToken,
    events: Option<Sender<RunEvent>>,
}

impl<D: InputDriver> Engine<D> {
    /// Build an engine. Probes the display scale once if DPI scaling is enabled.
    pub fn new(driver: D, mut config: GenerationConfig, base_dir: impl Into<PathBuf>) -> Self {
        let coords = CoordinateTransformer::from_config(&config, probe_dpi_scale);
        if let Some(scale) = coords.dpi_scale() {
            log::info!("Display scale factor: {}", scale);
        }
        Self {
            driver,
            steps: Arc::new(std::mem::take(&mut config.steps)),
            config,
            coords,
            base_dir: base_dir.into(),
            stop: StopToken::new(),
            events: None,
        }
    }

    pub fn with_transformer(mut self, coords: CoordinateTransformer) -> Self {
        self.coords = coords;
        self
    }

    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_events(mut self, events: Sender<RunEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Handle another thread can use to request a stop.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Where an item's audio file lives on disk.
    pub fn target_path(&self, audio_path: &str) -> PathBuf {
        self.base_dir.join(audio_path)
    }

    fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Sleep in slices of at most [`POLL_SLICE`], bailing out once stopped.
    fn pause(&mut self, duration: Duration) -> Result<(), StepError> {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.is_stopped() {
                return Err(StepError::Interrupted);
            }
            let slice = remaining.min(POLL_SLICE);
            self.driver.sleep(slice);
            remaining -= slice;
        }
        Ok(())
    }

    /// Pause between input primitives of one sequence. A stop aborts the
    /// rest of the sequence.
    fn pause_secs(&mut self, secs: f64) -> Result<(), StepError> {
        self.pause(seconds(secs))
    }

    /// Like [`Engine::pause`] but a stop just cuts the wait short. Only for
    /// waits that are followed by a stop check, never by more input.
    fn settle(&mut self, duration: Duration) {
        let _ = self.pause(duration);
    }
}
