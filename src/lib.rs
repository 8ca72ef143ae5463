//! Batch audio generation by driving a desktop text-to-speech application.
//!
//! A configured list of [`step_types::StepSpec`]s is replayed for every
//! catalog entry through an [`driver::InputDriver`]; each item counts as done
//! once its audio file exists on disk.

pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod hotkey;
pub mod step_types;
