//! Best-effort sound playback for notification requests.
//!
//! Sound files live under the notification directory, split the way the
//! settings dialog presents them: `notis/` holds the start and random
//! reminder sounds, `pause/` holds the stage-break and session-end
//! sounds. A missing or unplayable file is logged and skipped; playback
//! problems never reach the tick loop.

use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::error::SoundError;
use crate::events::NotificationKind;
use crate::storage::config::SoundsConfig;

const NOTIS_DIR: &str = "notis";
const PAUSE_DIR: &str = "pause";
const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Plays a requested notification category. Implementations are
/// best-effort: failures are swallowed locally.
pub trait NotificationSink: Send {
    fn play(&mut self, kind: NotificationKind);
    /// Halts any currently playing sound.
    fn stop(&mut self);
}

/// Sink that discards every request. Used when sound is disabled.
pub struct NullSink;

impl NotificationSink for NullSink {
    fn play(&mut self, _kind: NotificationKind) {}
    fn stop(&mut self) {}
}

/// Available audio files per notification folder.
#[derive(Debug, Clone, Default)]
pub struct SoundInventory {
    pub notis: Vec<String>,
    pub pause: Vec<String>,
}

/// Plays configured sounds through an external player process.
///
/// At most one sound plays at a time; a new request interrupts the
/// current one. The random reminder category holds a list of files and
/// one is chosen per request.
pub struct SoundPlayer {
    base_dir: PathBuf,
    sounds: SoundsConfig,
    rng: Pcg64,
    child: Option<Child>,
}

impl SoundPlayer {
    pub fn new(base_dir: impl Into<PathBuf>, sounds: SoundsConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            sounds,
            rng: Pcg64::from_entropy(),
            child: None,
        }
    }

    /// Deterministic random-sound choice for tests.
    pub fn with_seed(base_dir: impl Into<PathBuf>, sounds: SoundsConfig, seed: u64) -> Self {
        Self {
            base_dir: base_dir.into(),
            sounds,
            rng: Pcg64::seed_from_u64(seed),
            child: None,
        }
    }

    /// Creates the notification directory layout if absent.
    pub fn ensure_layout(base_dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(base_dir.join(NOTIS_DIR))?;
        std::fs::create_dir_all(base_dir.join(PAUSE_DIR))?;
        Ok(())
    }

    /// Lists the `.mp3`/`.wav` files available under `base_dir`.
    pub fn scan(base_dir: &Path) -> std::io::Result<SoundInventory> {
        Ok(SoundInventory {
            notis: list_audio_files(&base_dir.join(NOTIS_DIR))?,
            pause: list_audio_files(&base_dir.join(PAUSE_DIR))?,
        })
    }

    fn folder(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Start | NotificationKind::RandomReminder => NOTIS_DIR,
            NotificationKind::StageBreakStart | NotificationKind::TotalEnd => PAUSE_DIR,
        }
    }

    fn resolve(&mut self, kind: NotificationKind) -> Result<PathBuf, SoundError> {
        let folder = self.base_dir.join(Self::folder(kind));
        let name = match kind {
            NotificationKind::Start => Some(self.sounds.start.clone()),
            NotificationKind::RandomReminder => {
                self.sounds.random.choose(&mut self.rng).cloned()
            }
            NotificationKind::StageBreakStart => Some(self.sounds.stage_break_start.clone()),
            NotificationKind::TotalEnd => Some(self.sounds.total_end.clone()),
        }
        .filter(|name| !name.is_empty());

        let Some(name) = name else {
            return Err(SoundError::NotFound { path: folder });
        };
        let path = folder.join(name);
        if !path.exists() {
            return Err(SoundError::NotFound { path });
        }
        Ok(path)
    }
}

impl NotificationSink for SoundPlayer {
    fn play(&mut self, kind: NotificationKind) {
        self.stop();
        match self.resolve(kind).and_then(|path| spawn_player(&path)) {
            Ok(child) => self.child = Some(child),
            Err(err) => eprintln!("stagebell: skipping sound: {err}"),
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn list_audio_files(dir: &Path) -> std::io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(target_os = "macos")]
fn spawn_player(path: &Path) -> Result<Child, SoundError> {
    Command::new("afplay")
        .arg(path)
        .spawn()
        .map_err(|err| SoundError::SpawnFailed(err.to_string()))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn spawn_player(path: &Path) -> Result<Child, SoundError> {
    Command::new("paplay")
        .arg(path)
        .spawn()
        .or_else(|_| Command::new("aplay").arg(path).spawn())
        .map_err(|err| SoundError::SpawnFailed(err.to_string()))
}

#[cfg(not(unix))]
fn spawn_player(path: &Path) -> Result<Child, SoundError> {
    let _ = path;
    Err(SoundError::SpawnFailed(
        "no audio player available on this platform".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"riff").unwrap();
    }

    fn sounds() -> SoundsConfig {
        SoundsConfig {
            start: "chime.wav".into(),
            random: vec!["bell-a.mp3".into(), "bell-b.mp3".into()],
            stage_break_start: "gong.wav".into(),
            total_end: "fanfare.mp3".into(),
        }
    }

    fn populated_base() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        SoundPlayer::ensure_layout(dir.path()).unwrap();
        touch(&dir.path().join("notis/chime.wav"));
        touch(&dir.path().join("notis/bell-a.mp3"));
        touch(&dir.path().join("notis/bell-b.mp3"));
        touch(&dir.path().join("pause/gong.wav"));
        touch(&dir.path().join("pause/fanfare.mp3"));
        dir
    }

    #[test]
    fn resolves_each_category_to_its_folder() {
        let dir = populated_base();
        let mut player = SoundPlayer::with_seed(dir.path(), sounds(), 1);

        let start = player.resolve(NotificationKind::Start).unwrap();
        assert!(start.ends_with("notis/chime.wav"));
        let brk = player.resolve(NotificationKind::StageBreakStart).unwrap();
        assert!(brk.ends_with("pause/gong.wav"));
        let end = player.resolve(NotificationKind::TotalEnd).unwrap();
        assert!(end.ends_with("pause/fanfare.mp3"));
    }

    #[test]
    fn random_category_picks_a_configured_file() {
        let dir = populated_base();
        let mut player = SoundPlayer::with_seed(dir.path(), sounds(), 7);
        for _ in 0..16 {
            let path = player.resolve(NotificationKind::RandomReminder).unwrap();
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name == "bell-a.mp3" || name == "bell-b.mp3");
        }
    }

    #[test]
    fn unconfigured_category_is_not_found() {
        let dir = populated_base();
        let mut empty = SoundPlayer::with_seed(dir.path(), SoundsConfig::default(), 1);
        assert!(matches!(
            empty.resolve(NotificationKind::Start),
            Err(SoundError::NotFound { .. })
        ));
        assert!(matches!(
            empty.resolve(NotificationKind::RandomReminder),
            Err(SoundError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        SoundPlayer::ensure_layout(dir.path()).unwrap();
        let mut player = SoundPlayer::with_seed(dir.path(), sounds(), 1);
        assert!(matches!(
            player.resolve(NotificationKind::Start),
            Err(SoundError::NotFound { .. })
        ));
    }

    #[test]
    fn scan_lists_audio_files_only() {
        let dir = populated_base();
        touch(&dir.path().join("notis/readme.txt"));
        let inventory = SoundPlayer::scan(dir.path()).unwrap();
        assert_eq!(inventory.notis, vec!["bell-a.mp3", "bell-b.mp3", "chime.wav"]);
        assert_eq!(inventory.pause, vec!["fanfare.mp3", "gong.wav"]);
    }

    #[test]
    fn scan_tolerates_missing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = SoundPlayer::scan(dir.path()).unwrap();
        assert!(inventory.notis.is_empty());
        assert!(inventory.pause.is_empty());
    }
}
