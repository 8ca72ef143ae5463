//! Batch orchestration over a catalog slice.

use super::{Engine, RunEvent};
use crate::catalog::CatalogEntry;
use crate::config::seconds;
use crate::driver::InputDriver;

/// Totals for one run. `success_count + failed_count` equals the number of
/// items attempted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub success_count: usize,
    pub failed_count: usize,
    /// `"ID <id>: <message>"` per failed item, in processing order.
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn attempted(&self) -> usize {
        self.success_count + self.failed_count
    }
}

impl<D: InputDriver> Engine<D> {
    /// Process `items[start_index..end_index]` one after another.
    ///
    /// `end_index` defaults to the catalog length and is clamped to it.
    pub fn run(
        &mut self,
        items: &[CatalogEntry],
        start_index: usize,
        end_index: Option<usize>,
    ) -> RunResult {
        let total = items.len();
        let end = end_index.unwrap_or(total).min(total);
        let start = start_index.min(end);
        let batch = &items[start..end];
        let count = batch.len();

        log::info!(
            "Processing {} items (index {} to {})",
            count,
            start,
            end.saturating_sub(1)
        );
        let title = self.config.app_window_title.as_str();
        log::info!(
            "Target application: {}",
            if title.is_empty() { "<not configured>" } else { title }
        );
        self.emit(RunEvent::BatchStarted {
            count,
            first: start,
            last: end.saturating_sub(1),
        });

        let startup = self.config.startup_delay;
        if startup > 0.0 {
            log::info!("Make sure the target application is ready, starting in {}s", startup);
            self.settle(seconds(startup));
        }

        let mut result = RunResult::default();
        for (i, item) in batch.iter().enumerate() {
            if self.is_stopped() {
                log::warn!("Stop requested, ending batch");
                break;
            }

            let position = start + i + 1;
            self.emit(RunEvent::ItemStarted {
                position,
                total,
                id: item.label(),
                name: item.name.clone(),
            });
            let outcome = self.process(item, position, total);
            self.emit(RunEvent::ItemFinished {
                id: item.label(),
                outcome: outcome.clone(),
            });

            match outcome {
                Ok(status) => {
                    log::info!("  ID {}: {}", item.label(), status);
                    result.success_count += 1;
                }
                Err(e) => {
                    log::warn!("  ID {}: {}", item.label(), e);
                    result.failed_count += 1;
                    result.errors.push(format!("ID {}: {}", item.label(), e));
                    if e.is_interrupted() || self.is_stopped() {
                        log::warn!("Interrupted, ending batch");
                        break;
                    }
                }
            }

            if i + 1 < count && !self.is_stopped() {
                let delay = self.config.delay_between_items;
                self.settle(seconds(delay));
            }
        }

        log::info!(
            "Done: {} succeeded, {} failed",
            result.success_count,
            result.failed_count
        );
        for error in &result.errors {
            log::info!("  - {}", error);
        }
        self.emit(RunEvent::Finished(result.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::driver::mock::{Call, FakeDriver};
    use crate::error::StepError;
    use crate::executor::test_support::{engine, engine_with};
    use crate::executor::{ItemStatus, StopToken};
    use crate::step_types::{StepKind, StepSpec, WaitParams};
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(400);

    fn entry(id: i64, name: &str) -> CatalogEntry {
        CatalogEntry {
            id: Some(id),
            name: name.into(),
            name_english: format!("{}-en", id),
            audio: format!("out/{}.mp3", id),
        }
    }

    fn config(kinds: Vec<StepKind>) -> GenerationConfig {
        GenerationConfig {
            steps: kinds.into_iter().map(StepSpec::new).collect(),
            startup_delay: 0.0,
            delay_between_items: DELAY.as_secs_f64(),
            ..Default::default()
        }
    }

    #[test]
    fn counts_failures_and_delays_only_between_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(
            config(vec![StepKind::GenerateText, StepKind::CopyToClipboard]),
            dir.path(),
        );
        let items = vec![entry(1, "A"), entry(2, ""), entry(3, "C")];

        let result = engine.run(&items, 0, None);

        assert_eq!(result.success_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.errors, vec!["ID 2: name is empty".to_string()]);
        assert_eq!(result.attempted(), 3);

        let relevant: Vec<Call> = engine
            .driver()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::SetClipboard(_)) || **c == Call::Sleep(DELAY))
            .cloned()
            .collect();
        assert_eq!(
            relevant,
            vec![
                Call::SetClipboard("AA1-en,1-en 1-en 1-en。".into()),
                Call::Sleep(DELAY),
                Call::Sleep(DELAY),
                Call::SetClipboard("CC3-en,3-en 3-en 3-en。".into()),
            ]
        );
    }

    #[test]
    fn slice_bounds_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(config(vec![StepKind::GenerateText]), dir.path());
        let items = vec![entry(1, "A"), entry(2, "B"), entry(3, "C")];

        assert_eq!(engine.run(&items, 1, Some(99)).success_count, 2);
        assert_eq!(engine.run(&items, 5, None), RunResult::default());
        assert_eq!(engine.run(&items, 0, Some(1)).success_count, 1);
    }

    #[test]
    fn interruption_ends_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let token = StopToken::new();
        let driver =
            FakeDriver::new().stop_when(token.clone(), |c| matches!(c, Call::SetClipboard(_)));
        let mut engine = engine_with(
            driver,
            config(vec![StepKind::GenerateText, StepKind::CopyToClipboard]),
            dir.path(),
        )
        .with_stop_token(token);
        let items = vec![entry(1, "A"), entry(2, "B"), entry(3, "C")];

        let result = engine.run(&items, 0, None);

        assert_eq!(result.success_count, 0);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.errors, vec!["ID 1: interrupted".to_string()]);
        assert!(!engine.driver().calls.contains(&Call::Sleep(DELAY)));
    }

    #[test]
    fn fail_safe_ends_the_batch_as_interrupted() {
        let dir = tempfile::tempdir().unwrap();
        let driver = FakeDriver {
            fail_safe: true,
            ..FakeDriver::new()
        };
        let mut engine = engine_with(
            driver,
            config(vec![StepKind::GenerateText, StepKind::CopyToClipboard]),
            dir.path(),
        );

        let result = engine.run(&[entry(1, "A"), entry(2, "B")], 0, None);

        assert_eq!(result.failed_count, 1);
        assert_eq!(result.errors, vec!["ID 1: interrupted".to_string()]);
        assert_eq!(engine.driver().actions().len(), 1);
    }

    #[test]
    fn stop_before_start_attempts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(config(vec![StepKind::GenerateText]), dir.path());
        engine.stop_token().stop();

        let result = engine.run(&[entry(1, "A")], 0, None);
        assert_eq!(result, RunResult::default());
    }

    #[test]
    fn wait_step_stops_within_one_slice() {
        let dir = tempfile::tempdir().unwrap();
        let driver = FakeDriver {
            real_time: true,
            ..FakeDriver::new()
        };
        let mut engine = engine_with(
            driver,
            config(vec![StepKind::Wait(WaitParams { duration: 2.0 })]),
            dir.path(),
        );
        let token = engine.stop_token();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(600));
            token.stop();
        });

        let started = std::time::Instant::now();
        let result = engine.run(&[entry(1, "A")], 0, None);
        let elapsed = started.elapsed();
        stopper.join().unwrap();

        assert_eq!(result.errors, vec!["ID 1: interrupted".to_string()]);
        assert!(elapsed >= Duration::from_millis(600));
        assert!(elapsed <= Duration::from_millis(1_100), "took {:?}", elapsed);
    }

    #[test]
    fn events_follow_item_order() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut engine =
            engine(config(vec![StepKind::GenerateText]), dir.path()).with_events(tx);

        engine.run(&[entry(1, "A"), entry(2, "")], 0, None);
        drop(engine);

        let finished: Vec<(String, Result<ItemStatus, StepError>)> = rx
            .iter()
            .filter_map(|e| match e {
                RunEvent::ItemFinished { id, outcome } => Some((id, outcome)),
                _ => None,
            })
            .collect();
        assert_eq!(
            finished,
            vec![
                ("1".to_string(), Ok(ItemStatus::Completed)),
                ("2".to_string(), Err(StepError::failed("name is empty"))),
            ]
        );
    }
}
