use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerPhase;

/// Notification categories the engine can request.
///
/// The wire names match the sound categories in the persisted
/// configuration: `start`, `random`, `stage-break-start`, `total-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// A stage span begins (session start or return from a break).
    Start,
    /// The randomized mid-stage reminder fired.
    #[serde(rename = "random")]
    RandomReminder,
    /// A full stage completed and the long break begins.
    StageBreakStart,
    /// The total session budget is exhausted.
    TotalEnd,
}

/// Immutable snapshot of one engine tick.
///
/// Published as a value per tick; consumers never see partially updated
/// counters. `stage_remaining` reads 0 during a stage break and
/// `break_remaining` reads 0 during a stage, matching the three-clock
/// display rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickResult {
    pub phase: TimerPhase,
    pub total_remaining: u64,
    pub stage_remaining: u64,
    pub break_remaining: u64,
    /// 0.0 .. 100.0 across the whole session budget.
    pub total_progress_pct: f64,
    /// 0.0 .. 100.0 within the current stage or break span.
    pub span_progress_pct: f64,
    pub running: bool,
    pub paused: bool,
    /// Ordered notification requests raised by this tick (at most two:
    /// one phase transition plus a possible total-end).
    pub notifications: Vec<NotificationKind>,
    pub at: DateTime<Utc>,
}

impl TickResult {
    /// The terminal snapshot rendered once after a session ends.
    pub fn zeroed() -> Self {
        Self {
            phase: TimerPhase::Idle,
            total_remaining: 0,
            stage_remaining: 0,
            break_remaining: 0,
            total_progress_pct: 0.0,
            span_progress_pct: 0.0,
            running: false,
            paused: false,
            notifications: Vec::new(),
            at: Utc::now(),
        }
    }

    pub fn total_clock(&self) -> String {
        format_hms(self.total_remaining)
    }

    pub fn stage_clock(&self) -> String {
        format_hms(self.stage_remaining)
    }

    pub fn break_clock(&self) -> String {
        format_hms(self.break_remaining)
    }
}

/// Renders a tick snapshot. Implemented by the front end.
pub trait ProgressDisplay {
    fn render(&mut self, tick: &TickResult);
}

/// `hh:mm:ss` with zero-padded fields.
pub fn format_hms(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
