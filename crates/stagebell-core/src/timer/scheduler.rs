//! Fixed-cadence tick driver.
//!
//! One background tokio task owns tick execution; every other component
//! reaches the engine through the shared handle and only toggles the
//! pause/running flags. Snapshots travel as immutable values on a watch
//! channel, so a slow or absent consumer never blocks the loop.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::engine::TimerEngine;
use crate::events::TickResult;
use crate::sound::NotificationSink;

/// Shared, mutex-guarded engine handle.
pub type SharedEngine = Arc<Mutex<TimerEngine>>;

/// Shared notification sink handle.
pub type SharedSink = Arc<Mutex<dyn NotificationSink>>;

/// Drives `TimerEngine::tick()` once per wall-clock second until the
/// engine stops, forwarding notifications to the sink and snapshots to
/// watch subscribers. Control calls take effect within one tick period.
pub struct TickScheduler {
    engine: SharedEngine,
    sink: SharedSink,
    updates: watch::Receiver<TickResult>,
    handle: JoinHandle<()>,
}

impl TickScheduler {
    /// Spawns the tick loop for an already-started engine.
    ///
    /// Must be called within a tokio runtime. The loop exits on its own
    /// once the engine reports not-running, publishing one final zeroed
    /// snapshot first.
    pub fn spawn(engine: SharedEngine, sink: SharedSink) -> Self {
        let initial = lock(&engine).snapshot();
        let (tx, updates) = watch::channel(initial);

        let loop_engine = Arc::clone(&engine);
        let loop_sink = Arc::clone(&sink);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick resolves immediately; consume it so
            // the first engine tick lands one second after spawn.
            interval.tick().await;
            loop {
                interval.tick().await;
                let result = lock(&loop_engine).tick();
                for kind in &result.notifications {
                    lock_sink(&loop_sink).play(*kind);
                }
                let running = result.running;
                let _ = tx.send(result);
                if !running {
                    // A watch channel keeps only the latest value. Hold the
                    // terminal render for one interval so subscribers can
                    // observe the final counters before the zeroed snapshot
                    // replaces them.
                    interval.tick().await;
                    let _ = tx.send(TickResult::zeroed());
                    break;
                }
            }
        });

        Self {
            engine,
            sink,
            updates,
            handle,
        }
    }

    /// New subscription to the per-tick snapshots.
    pub fn subscribe(&self) -> watch::Receiver<TickResult> {
        self.updates.clone()
    }

    /// Pauses counting (the cadence keeps running) and stops playback.
    pub fn pause(&self) {
        lock(&self.engine).pause();
        lock_sink(&self.sink).stop();
    }

    pub fn resume(&self) {
        lock(&self.engine).resume();
    }

    /// Toggles between paused and counting.
    pub fn pause_or_resume(&self) {
        let paused = {
            let mut engine = lock(&self.engine);
            if engine.is_paused() {
                engine.resume();
                false
            } else {
                engine.pause();
                true
            }
        };
        if paused {
            lock_sink(&self.sink).stop();
        }
    }

    /// Cancels the run. The loop observes the stopped engine within one
    /// tick interval and exits through the normal completion path.
    pub fn stop(&self) {
        lock(&self.engine).stop();
        lock_sink(&self.sink).stop();
    }

    /// Waits for the tick loop to finish.
    pub async fn wait(self) {
        let _ = self.handle.await;
    }
}

fn lock(engine: &SharedEngine) -> MutexGuard<'_, TimerEngine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock_sink(sink: &SharedSink) -> MutexGuard<'_, dyn NotificationSink + 'static> {
    sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
