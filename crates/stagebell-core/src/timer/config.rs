use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Validated per-run timer values, all in whole seconds.
///
/// Immutable for the duration of one run; a new run takes a fresh
/// validated instance. Validation is the single gate that keeps the
/// progress-fraction denominators non-zero once a run has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Overall session budget across all stages and breaks.
    pub total_secs: u64,
    /// Length of one focused-work stage.
    pub stage_secs: u64,
    /// Lower bound for the next random reminder offset (inclusive).
    pub reminder_min_secs: u64,
    /// Upper bound for the next random reminder offset (inclusive).
    pub reminder_max_secs: u64,
    /// Brief rest taken when a random reminder fires.
    pub short_break_secs: u64,
    /// Longer rest taken when a full stage completes.
    pub stage_break_secs: u64,
}

impl TimerConfig {
    /// Rejects zero durations and out-of-order reminder bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_secs == 0 {
            return Err(ConfigError::invalid("total_secs", "must be greater than zero"));
        }
        if self.stage_secs == 0 {
            return Err(ConfigError::invalid("stage_secs", "must be greater than zero"));
        }
        if self.reminder_min_secs == 0 {
            return Err(ConfigError::invalid(
                "reminder_min_secs",
                "must be greater than zero",
            ));
        }
        if self.reminder_min_secs > self.reminder_max_secs {
            return Err(ConfigError::invalid(
                "reminder_min_secs",
                format!(
                    "lower bound {} exceeds upper bound {}",
                    self.reminder_min_secs, self.reminder_max_secs
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TimerConfig {
        TimerConfig {
            total_secs: 8 * 3600,
            stage_secs: 90 * 60,
            reminder_min_secs: 5 * 60,
            reminder_max_secs: 10 * 60,
            short_break_secs: 10,
            stage_break_secs: 620,
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_breaks_are_allowed() {
        let cfg = TimerConfig {
            short_break_secs: 0,
            stage_break_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_total() {
        let cfg = TimerConfig { total_secs: 0, ..valid() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "total_secs"
        ));
    }

    #[test]
    fn rejects_zero_stage() {
        let cfg = TimerConfig { stage_secs: 0, ..valid() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_reminder_min() {
        let cfg = TimerConfig { reminder_min_secs: 0, ..valid() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_reminder_bounds() {
        let cfg = TimerConfig {
            reminder_min_secs: 600,
            reminder_max_secs: 300,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn equal_reminder_bounds_are_valid() {
        let cfg = TimerConfig {
            reminder_min_secs: 180,
            reminder_max_secs: 180,
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }
}
