use crate::domain::time::duration_minutes;
use crate::infrastructure::error::JournalError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

type CompletionCallback = Box<dyn FnMut() + Send>;

/// Countdown state machine for focused execution of one time box.
///
/// The machine is advanced by an injected [`tick`](CountdownTimer::tick), one
/// call per elapsed second, so tests drive it without real delay.
/// Transitions: `Idle → Running ⇄ Paused`, `Running → Completed` when the
/// count reaches zero, and `Running/Paused → Idle` via [`stop`]. Invalid
/// transitions are no-ops. The completion callback fires exactly once per
/// run.
///
/// [`stop`]: CountdownTimer::stop
pub struct CountdownTimer {
    total_seconds: u32,
    remaining_seconds: u32,
    phase: TimerPhase,
    on_complete: Option<CompletionCallback>,
}

impl CountdownTimer {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            phase: TimerPhase::Idle,
            on_complete: None,
        }
    }

    /// Builds a timer spanning a scheduled `HH:MM` pair.
    pub fn for_range(start: &str, end: &str) -> Result<Self, JournalError> {
        let minutes = duration_minutes(start, end)?;
        if minutes <= 0 {
            return Err(JournalError::Validation(
                "timer range must have positive duration".to_string(),
            ));
        }
        Ok(Self::new(minutes as u32 * 60))
    }

    pub fn set_on_complete(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Resets the count to the full duration and begins running.
    pub fn start(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.phase = TimerPhase::Running;
    }

    /// Halts the countdown, retaining the remaining time. Running only.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Continues from the retained remaining time. No-op unless paused.
    pub fn resume(&mut self) {
        if self.phase == TimerPhase::Paused {
            self.phase = TimerPhase::Running;
        }
    }

    /// Abandons the run and resets to the full duration.
    pub fn stop(&mut self) {
        if matches!(self.phase, TimerPhase::Running | TimerPhase::Paused) {
            self.remaining_seconds = self.total_seconds;
            self.phase = TimerPhase::Idle;
        }
    }

    /// Advances the countdown by one second while running.
    pub fn tick(&mut self) {
        if self.phase != TimerPhase::Running {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Completed;
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Elapsed share of the configured duration in percent; 0 for an empty
    /// duration.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.remaining_seconds) / f64::from(self.total_seconds)
            * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub progress: f64,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }
}

/// A [`CountdownTimer`] driven by a spawned one-second tick task.
///
/// `pause` and `stop` cancel the tick task, and dropping the handle aborts
/// any live task, so a completion callback never fires after the owning
/// screen has lost interest. Must be used within a tokio runtime.
pub struct TickingTimer {
    timer: Arc<Mutex<CountdownTimer>>,
    tick_task: Option<JoinHandle<()>>,
}

impl TickingTimer {
    pub fn new(timer: CountdownTimer) -> Self {
        Self {
            timer: Arc::new(Mutex::new(timer)),
            tick_task: None,
        }
    }

    pub fn for_range(start: &str, end: &str) -> Result<Self, JournalError> {
        Ok(Self::new(CountdownTimer::for_range(start, end)?))
    }

    pub fn set_on_complete(&self, callback: impl FnMut() + Send + 'static) {
        self.lock().set_on_complete(callback);
    }

    pub fn start(&mut self) {
        self.cancel_tick();
        self.lock().start();
        self.spawn_tick();
    }

    pub fn pause(&mut self) {
        self.lock().pause();
        self.cancel_tick();
    }

    pub fn resume(&mut self) {
        let running = {
            let mut timer = self.lock();
            timer.resume();
            timer.is_running()
        };
        if running && self.tick_task.is_none() {
            self.spawn_tick();
        }
    }

    pub fn stop(&mut self) {
        self.cancel_tick();
        self.lock().stop();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let timer = self.lock();
        TimerSnapshot {
            phase: timer.phase(),
            remaining_seconds: timer.remaining_seconds(),
            total_seconds: timer.total_seconds(),
            progress: timer.progress(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CountdownTimer> {
        // Ticks never fail; a panicking completion callback must not wedge
        // the timer, so poisoning is recovered rather than propagated.
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_tick(&mut self) {
        let timer = Arc::clone(&self.timer);
        self.tick_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately; consume it so
            // the countdown starts a full second after start().
            interval.tick().await;
            loop {
                interval.tick().await;
                let completed = {
                    let mut timer = timer.lock().unwrap_or_else(PoisonError::into_inner);
                    timer.tick();
                    timer.phase() == TimerPhase::Completed
                };
                if completed {
                    break;
                }
            }
        }));
    }

    fn cancel_tick(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }
}

impl Drop for TickingTimer {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}
