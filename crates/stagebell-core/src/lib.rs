//! # Stagebell Core Library
//!
//! Core logic for Stagebell, a multi-stage session timer with randomly
//! timed reminders. A long work session is split into fixed stages; inside
//! a stage, reminders fire at random offsets and open a short break, and
//! completed stages open a longer break.
//!
//! The library is CLI-first: all behavior lives here and the binary crate
//! is a thin front-end over it.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: tick-driven phase state machine
//! - [`TickScheduler`]: 1 Hz driver that owns the background tick task
//! - [`SoundPlayer`]: best-effort notification sound playback
//! - [`ConfigFile`]: TOML configuration persistence

pub mod error;
pub mod events;
pub mod sound;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, SoundError};
pub use events::{format_hms, NotificationKind, ProgressDisplay, TickResult};
pub use sound::{NotificationSink, NullSink, SoundInventory, SoundPlayer};
pub use storage::{ConfigFile, SoundsConfig};
pub use timer::{
    IntervalPicker, SharedEngine, SharedSink, TickScheduler, TimerConfig, TimerEngine, TimerPhase,
    UniformPicker,
};
