//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - the caller invokes `tick()` once per elapsed second.
//!
//! ## Phase Transitions
//!
//! ```text
//! Idle -> Stage -> ShortBreak -> Stage -> ... -> StageBreak -> Stage -> Idle
//! ```
//!
//! A random reminder interrupts a stage with a short break; a drained
//! stage takes the longer stage break and restarts the stage clock
//! afterwards. The total budget counts down through all of it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::TimerConfig;
use super::interval::{IntervalPicker, UniformPicker};
use crate::error::ConfigError;
use crate::events::{NotificationKind, TickResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Stage,
    ShortBreak,
    StageBreak,
}

/// Denominators frozen at `start()` for progress-fraction math.
///
/// `total` and `stage` are validated non-zero before a run begins, so the
/// fractions computed against them can never divide by zero.
#[derive(Debug, Clone, Copy, Default)]
struct InitialDurations {
    total: u64,
    stage: u64,
    short_break: u64,
    stage_break: u64,
}

/// Core timer engine.
///
/// Owns every countdown counter exclusively. Callers interact through
/// `start`/`pause`/`resume`/`stop`/`tick` and receive immutable
/// [`TickResult`] snapshots; no live counter is ever shared.
pub struct TimerEngine {
    phase: TimerPhase,
    total_remaining: u64,
    stage_remaining: u64,
    break_remaining: u64,
    /// Seconds until the next random reminder; consulted only in `Stage`.
    next_reminder: u64,
    running: bool,
    paused: bool,
    initial: InitialDurations,
    /// Live reminder bounds. Updated mid-run via `set_reminder_bounds`;
    /// a change takes effect at the next draw, not retroactively.
    reminder_min_secs: u64,
    reminder_max_secs: u64,
    picker: Box<dyn IntervalPicker>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::with_picker(Box::new(UniformPicker::new()))
    }

    pub fn with_picker(picker: Box<dyn IntervalPicker>) -> Self {
        Self {
            phase: TimerPhase::Idle,
            total_remaining: 0,
            stage_remaining: 0,
            break_remaining: 0,
            next_reminder: 0,
            running: false,
            paused: false,
            initial: InitialDurations::default(),
            reminder_min_secs: 0,
            reminder_max_secs: 0,
            picker,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current state as an immutable snapshot with no notifications.
    pub fn snapshot(&self) -> TickResult {
        TickResult {
            phase: self.phase,
            total_remaining: self.total_remaining,
            stage_remaining: if self.phase == TimerPhase::StageBreak {
                0
            } else {
                self.stage_remaining
            },
            break_remaining: match self.phase {
                TimerPhase::ShortBreak | TimerPhase::StageBreak => self.break_remaining,
                _ => 0,
            },
            total_progress_pct: self.total_progress_pct(),
            span_progress_pct: self.span_progress_pct(),
            running: self.running,
            paused: self.paused,
            notifications: Vec::new(),
            at: Utc::now(),
        }
    }

    fn total_progress_pct(&self) -> f64 {
        fraction_pct(self.initial.total, self.total_remaining)
    }

    fn span_progress_pct(&self) -> f64 {
        match self.phase {
            TimerPhase::Stage => fraction_pct(self.initial.stage, self.stage_remaining),
            TimerPhase::ShortBreak => fraction_pct(self.initial.short_break, self.break_remaining),
            TimerPhase::StageBreak => fraction_pct(self.initial.stage_break, self.break_remaining),
            TimerPhase::Idle => 0.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validates `config` and arms a fresh run.
    ///
    /// Returns the `Start` notification request for the caller to forward
    /// to the sink. Fails without touching state if the configuration is
    /// invalid.
    pub fn start(&mut self, config: TimerConfig) -> Result<NotificationKind, ConfigError> {
        config.validate()?;
        self.initial = InitialDurations {
            total: config.total_secs,
            stage: config.stage_secs,
            short_break: config.short_break_secs,
            stage_break: config.stage_break_secs,
        };
        self.reminder_min_secs = config.reminder_min_secs;
        self.reminder_max_secs = config.reminder_max_secs;
        self.phase = TimerPhase::Stage;
        self.total_remaining = config.total_secs;
        self.stage_remaining = config.stage_secs;
        self.break_remaining = 0;
        self.next_reminder = self.draw_reminder();
        self.running = true;
        self.paused = false;
        Ok(NotificationKind::Start)
    }

    /// No-op unless running and not already paused.
    pub fn pause(&mut self) {
        if self.running && !self.paused {
            self.paused = true;
        }
    }

    /// No-op unless running and paused.
    pub fn resume(&mut self) {
        if self.running && self.paused {
            self.paused = false;
        }
    }

    /// Unconditional and idempotent: zeroes every counter and returns the
    /// engine to the terminal form.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.reset_counters();
    }

    /// Replaces the reminder bounds consulted at the next draw.
    pub fn set_reminder_bounds(&mut self, min_secs: u64, max_secs: u64) -> Result<(), ConfigError> {
        if min_secs == 0 {
            return Err(ConfigError::invalid(
                "reminder_min_secs",
                "must be greater than zero",
            ));
        }
        if min_secs > max_secs {
            return Err(ConfigError::invalid(
                "reminder_min_secs",
                format!("lower bound {min_secs} exceeds upper bound {max_secs}"),
            ));
        }
        self.reminder_min_secs = min_secs;
        self.reminder_max_secs = max_secs;
        Ok(())
    }

    /// Advances the state by exactly one second of elapsed time.
    ///
    /// Returns the current snapshot untouched when stopped or paused.
    /// Never fails once `start()` succeeded: all arithmetic is unsigned
    /// with explicit floors, and the progress denominators were validated
    /// non-zero at start.
    pub fn tick(&mut self) -> TickResult {
        if !self.running || self.paused {
            return self.snapshot();
        }

        let mut notifications = Vec::new();
        let mut transitioned = false;

        if self.total_remaining > 0 {
            self.total_remaining -= 1;
        }

        match self.phase {
            TimerPhase::Stage => {
                if self.stage_remaining > 0 {
                    self.stage_remaining -= 1;
                    self.next_reminder = self.next_reminder.saturating_sub(1);
                }
                if self.stage_remaining == 0 {
                    // Stage completion wins over a reminder that expired on
                    // the same tick; the reminder's break is dropped.
                    notifications.push(NotificationKind::StageBreakStart);
                    self.phase = TimerPhase::StageBreak;
                    self.break_remaining = self.initial.stage_break;
                    transitioned = true;
                } else if self.next_reminder == 0 {
                    notifications.push(NotificationKind::RandomReminder);
                    self.phase = TimerPhase::ShortBreak;
                    self.break_remaining = self.initial.short_break;
                    transitioned = true;
                }
            }
            TimerPhase::ShortBreak => {
                if self.break_remaining > 0 {
                    self.break_remaining -= 1;
                }
                if self.break_remaining == 0 {
                    notifications.push(NotificationKind::Start);
                    self.phase = TimerPhase::Stage;
                    // The stage clock resumes where the reminder cut it off.
                    self.next_reminder = self.draw_reminder();
                    transitioned = true;
                }
            }
            TimerPhase::StageBreak => {
                if self.break_remaining > 0 {
                    self.break_remaining -= 1;
                }
                if self.break_remaining == 0 {
                    notifications.push(NotificationKind::Start);
                    self.phase = TimerPhase::Stage;
                    self.stage_remaining = self.initial.stage;
                    self.next_reminder = self.draw_reminder();
                    transitioned = true;
                }
            }
            TimerPhase::Idle => {}
        }

        if self.total_remaining == 0 {
            notifications.push(NotificationKind::TotalEnd);
            self.running = false;
            self.paused = false;
        }

        let mut result = self.snapshot();
        if transitioned {
            // The span readout restarts from zero on the transition tick.
            result.span_progress_pct = 0.0;
        }
        result.notifications = notifications;

        if !self.running {
            // Natural completion discards the run state entirely.
            self.reset_counters();
        }
        result
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn draw_reminder(&mut self) -> u64 {
        self.picker.pick(self.reminder_min_secs, self.reminder_max_secs)
    }

    fn reset_counters(&mut self) {
        self.phase = TimerPhase::Idle;
        self.total_remaining = 0;
        self.stage_remaining = 0;
        self.break_remaining = 0;
        self.next_reminder = 0;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn fraction_pct(initial: u64, remaining: u64) -> f64 {
    if initial == 0 {
        return 0.0;
    }
    let elapsed = initial.saturating_sub(remaining) as f64;
    (elapsed / initial as f64 * 100.0).clamp(0.0, 100.0)
}
