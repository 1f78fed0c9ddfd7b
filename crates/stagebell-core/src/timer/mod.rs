mod config;
mod engine;
mod interval;
mod scheduler;

pub use config::TimerConfig;
pub use engine::{TimerEngine, TimerPhase};
pub use interval::{IntervalPicker, UniformPicker};
pub use scheduler::{SharedEngine, SharedSink, TickScheduler};

#[cfg(test)]
pub use interval::FixedPicker;
