//! The `run` command: drives one timer session in the foreground.
//!
//! Loads the persisted configuration, applies any command-line overrides,
//! then prints one status line (or JSON snapshot) per tick until the
//! session budget drains or Ctrl-C cancels it. While running, `p` on
//! stdin toggles pause and `q` stops the session.

use std::io::BufRead;
use std::sync::{Arc, Mutex, MutexGuard};

use clap::Args;
use stagebell_core::sound::{NotificationSink, NullSink, SoundPlayer};
use stagebell_core::storage::{notification_dir, ConfigFile};
use stagebell_core::timer::{SharedEngine, SharedSink, TickScheduler, TimerConfig, TimerEngine};
use stagebell_core::{NotificationKind, ProgressDisplay, TickResult};

#[derive(Args)]
pub struct RunArgs {
    /// Total session budget in seconds (overrides config)
    #[arg(long)]
    total: Option<u64>,
    /// Stage length in seconds (overrides config)
    #[arg(long)]
    stage: Option<u64>,
    /// Reminder offset lower bound in seconds (overrides config)
    #[arg(long)]
    reminder_min: Option<u64>,
    /// Reminder offset upper bound in seconds (overrides config)
    #[arg(long)]
    reminder_max: Option<u64>,
    /// Short break length in seconds (overrides config)
    #[arg(long)]
    short_break: Option<u64>,
    /// Stage break length in seconds (overrides config)
    #[arg(long)]
    stage_break: Option<u64>,
    /// Disable sound playback
    #[arg(long)]
    no_sound: bool,
    /// Emit one JSON snapshot per tick instead of the status line
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn timer_config(&self, file: &ConfigFile) -> TimerConfig {
        TimerConfig {
            total_secs: self.total.unwrap_or_else(|| file.total_time.total_secs()),
            stage_secs: self.stage.unwrap_or_else(|| file.stage_time.total_secs()),
            reminder_min_secs: self
                .reminder_min
                .unwrap_or(file.random_reminder.min * 60),
            reminder_max_secs: self
                .reminder_max
                .unwrap_or(file.random_reminder.max * 60),
            short_break_secs: self
                .short_break
                .unwrap_or_else(|| file.short_break.total_secs()),
            stage_break_secs: self
                .stage_break
                .unwrap_or_else(|| file.stage_break.total_secs()),
        }
    }
}

/// Per-tick console renderer.
struct ConsoleDisplay {
    json: bool,
}

impl ProgressDisplay for ConsoleDisplay {
    fn render(&mut self, tick: &TickResult) {
        if self.json {
            if let Ok(line) = serde_json::to_string(tick) {
                println!("{line}");
            }
            return;
        }
        for kind in &tick.notifications {
            match kind {
                NotificationKind::Start => println!(">> stage start"),
                NotificationKind::RandomReminder => println!(">> random reminder"),
                NotificationKind::StageBreakStart => println!(">> stage break"),
                NotificationKind::TotalEnd => println!(">> session complete"),
            }
        }
        println!(
            "[{phase:?}] total {total} ({pct:5.1}%)  stage {stage}  break {brk}",
            phase = tick.phase,
            total = tick.total_clock(),
            pct = tick.total_progress_pct,
            stage = tick.stage_clock(),
            brk = tick.break_clock(),
        );
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = ConfigFile::load()?;
    let config = args.timer_config(&file);

    let mut engine = TimerEngine::new();
    let start_kind = engine.start(config)?;

    let sink: SharedSink = if args.no_sound {
        Arc::new(Mutex::new(NullSink))
    } else {
        let base = notification_dir()?;
        SoundPlayer::ensure_layout(&base)?;
        Arc::new(Mutex::new(SoundPlayer::new(base, file.sounds.clone())))
    };
    lock_sink(&sink).play(start_kind);

    let mut display = ConsoleDisplay { json: args.json };
    if !args.json {
        println!("controls: p = pause/resume, q = stop");
    }
    let engine: SharedEngine = Arc::new(Mutex::new(engine));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let scheduler = TickScheduler::spawn(engine, sink);
        let mut updates = scheduler.subscribe();
        let mut commands = spawn_stdin_reader();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    match changed {
                        Ok(()) => {
                            let tick = updates.borrow_and_update().clone();
                            display.render(&tick);
                        }
                        // Sender dropped: the tick loop has exited.
                        Err(_) => break,
                    }
                }
                command = commands.recv(), if stdin_open => {
                    match command.as_deref() {
                        Some("p") | Some("pause") => scheduler.pause_or_resume(),
                        Some("q") | Some("quit") | Some("stop") => scheduler.stop(),
                        Some(_) => {}
                        None => stdin_open = false,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    scheduler.stop();
                }
            }
        }

        scheduler.wait().await;
    });

    Ok(())
}

/// Forwards trimmed stdin lines to the run loop from a blocking reader
/// thread; the thread ends with the process.
fn spawn_stdin_reader() -> tokio::sync::mpsc::UnboundedReceiver<String> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

fn lock_sink(sink: &SharedSink) -> MutexGuard<'_, dyn NotificationSink + 'static> {
    sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
