//! TOML-based application configuration.
//!
//! Stores the durations the timer runs with and the sound file names per
//! notification category. Durations are kept in the human-friendly shape
//! the settings dialog edits (hours/minutes/seconds fields, reminder
//! bounds in minutes) and converted to whole seconds when a run starts.
//!
//! Configuration is stored at `~/.config/stagebell/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::TimerConfig;

/// Duration entered as separate hour/minute/second fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmsTime {
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl HmsTime {
    pub fn total_secs(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Duration entered as minute/second fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsTime {
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl MsTime {
    pub fn total_secs(&self) -> u64 {
        self.minutes * 60 + self.seconds
    }
}

/// Random reminder bounds, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRange {
    #[serde(default = "default_reminder_min")]
    pub min: u64,
    #[serde(default = "default_reminder_max")]
    pub max: u64,
}

/// Sound file names per notification category, relative to the
/// notification folders. `random` holds a list; one entry is chosen per
/// reminder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub random: Vec<String>,
    #[serde(default)]
    pub stage_break_start: String,
    #[serde(default)]
    pub total_end: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/stagebell/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_total_time")]
    pub total_time: HmsTime,
    #[serde(default = "default_stage_time")]
    pub stage_time: HmsTime,
    #[serde(default)]
    pub random_reminder: ReminderRange,
    #[serde(default = "default_short_break")]
    pub short_break: MsTime,
    #[serde(default = "default_stage_break")]
    pub stage_break: MsTime,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

fn default_total_time() -> HmsTime {
    HmsTime {
        hours: 8,
        minutes: 0,
        seconds: 0,
    }
}
fn default_stage_time() -> HmsTime {
    HmsTime {
        hours: 1,
        minutes: 30,
        seconds: 0,
    }
}
fn default_short_break() -> MsTime {
    MsTime {
        minutes: 0,
        seconds: 10,
    }
}
fn default_stage_break() -> MsTime {
    MsTime {
        minutes: 10,
        seconds: 20,
    }
}
fn default_reminder_min() -> u64 {
    5
}
fn default_reminder_max() -> u64 {
    10
}

impl Default for ReminderRange {
    fn default() -> Self {
        Self {
            min: default_reminder_min(),
            max: default_reminder_max(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            total_time: default_total_time(),
            stage_time: default_stage_time(),
            random_reminder: ReminderRange::default(),
            short_break: default_short_break(),
            stage_break: default_stage_break(),
            sounds: SoundsConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|err| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/stagebell"),
            message: err.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from `path`, writing (and returning) the default when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or
    /// if the default config cannot be written. Only a missing file takes
    /// the write-defaults path; any other read failure is surfaced so an
    /// existing config is never clobbered.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|err| ConfigError::ParseFailed(err.to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<bool, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Persist to `path`. Returns `false` when the file already holds the
    /// identical content and no write was performed.
    pub fn save_to(&self, path: &Path) -> Result<bool, ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        if let Ok(existing) = std::fs::read_to_string(path) {
            if existing == content {
                return Ok(false);
            }
        }
        std::fs::write(path, content).map_err(|err| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(true)
    }

    /// Converts to validated per-run timer values in whole seconds.
    /// Reminder bounds are stored in minutes.
    pub fn to_timer_config(&self) -> Result<TimerConfig, ConfigError> {
        let cfg = TimerConfig {
            total_secs: self.total_time.total_secs(),
            stage_secs: self.stage_time.total_secs(),
            reminder_min_secs: self.random_reminder.min * 60,
            reminder_max_secs: self.random_reminder.max * 60,
            short_break_secs: self.short_break.total_secs(),
            stage_break_secs: self.stage_break.total_secs(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist; callers
    /// save explicitly so a failed parse leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the existing field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)
            .map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|err| ConfigError::ParseFailed(err.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value.parse::<u64>().map_err(|_| {
                        ConfigError::ParseFailed(format!("cannot parse '{value}' as number"))
                    })?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value)
                        .map_err(|err| ConfigError::ParseFailed(err.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Err(ConfigError::UnknownKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_session_shape() {
        let cfg = ConfigFile::default();
        assert_eq!(cfg.total_time.total_secs(), 8 * 3600);
        assert_eq!(cfg.stage_time.total_secs(), 90 * 60);
        assert_eq!(cfg.random_reminder.min, 5);
        assert_eq!(cfg.random_reminder.max, 10);
        assert_eq!(cfg.short_break.total_secs(), 10);
        assert_eq!(cfg.stage_break.total_secs(), 620);
        assert!(cfg.sounds.start.is_empty());
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = ConfigFile::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_falls_back_to_field_defaults() {
        let parsed: ConfigFile = toml::from_str(
            "[total_time]\nhours = 2\n\n[sounds]\nstart = \"chime.wav\"\n",
        )
        .unwrap();
        assert_eq!(parsed.total_time.total_secs(), 2 * 3600);
        assert_eq!(parsed.stage_time.total_secs(), 90 * 60);
        assert_eq!(parsed.sounds.start, "chime.wav");
    }

    #[test]
    fn converts_to_timer_seconds() {
        let cfg = ConfigFile::default();
        let timer = cfg.to_timer_config().unwrap();
        assert_eq!(timer.total_secs, 28_800);
        assert_eq!(timer.stage_secs, 5_400);
        assert_eq!(timer.reminder_min_secs, 300);
        assert_eq!(timer.reminder_max_secs, 600);
        assert_eq!(timer.short_break_secs, 10);
        assert_eq!(timer.stage_break_secs, 620);
    }

    #[test]
    fn conversion_rejects_invalid_durations() {
        let mut cfg = ConfigFile::default();
        cfg.total_time = HmsTime {
            hours: 0,
            minutes: 0,
            seconds: 0,
        };
        assert!(matches!(
            cfg.to_timer_config(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "total_secs"
        ));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = ConfigFile::default();
        assert_eq!(cfg.get("total_time.hours").as_deref(), Some("8"));
        assert_eq!(cfg.get("random_reminder.max").as_deref(), Some("10"));
        assert!(cfg.get("total_time.missing").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = ConfigFile::default();
        cfg.set("stage_time.minutes", "45").unwrap();
        assert_eq!(cfg.stage_time.minutes, 45);
    }

    #[test]
    fn set_updates_string_list() {
        let mut cfg = ConfigFile::default();
        cfg.set("sounds.random", "[\"a.mp3\", \"b.mp3\"]").unwrap();
        assert_eq!(cfg.sounds.random, vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = ConfigFile::default();
        assert!(matches!(
            cfg.set("no_such.key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_unparsable_number() {
        let mut cfg = ConfigFile::default();
        assert!(matches!(
            cfg.set("total_time.hours", "soon"),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_and_reload_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = ConfigFile::default();
        cfg.random_reminder = ReminderRange { min: 3, max: 7 };
        cfg.sounds.start = "chime.wav".into();
        assert!(cfg.save_to(&path).unwrap());

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn identical_resave_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = ConfigFile::default();
        assert!(cfg.save_to(&path).unwrap());
        assert!(!cfg.save_to(&path).unwrap());
    }

    #[test]
    fn unreadable_existing_config_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        // A directory at the config path fails the read without being a
        // missing file; the entry must survive untouched.
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = ConfigFile::load_from(&path).unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert!(path.exists());
    }
}
