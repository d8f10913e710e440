//! Interval scheduler driving wallpaper rotation.
//!
//! The scheduler owns at most one timer thread. Every start or re-arm bumps a
//! generation counter; a timer thread whose generation is stale exits instead
//! of firing, so `stop()` never has to join and is safe to call from inside
//! the tick callback.

mod clock;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeDelta};
use parking_lot::{Condvar, Mutex};

pub use self::clock::{Clock, ManualClock, SystemClock};
use crate::platform::thread::spawn_named_thread;

/// Callback run on every tick.
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Text returned by [`IntervalScheduler::next_tick_timestamp`] before the first start.
pub const NEVER: &str = "Never";

/// Snapshot of the scheduler's in-memory state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    /// When the timer was last started or last fired.
    pub last_tick: Option<DateTime<Local>>,
    /// Tick period in seconds.
    pub interval_seconds: f64,
    /// Whether the timer is armed.
    pub running: bool,
}

#[derive(Debug)]
struct Inner {
    last_tick: Option<DateTime<Local>>,
    interval_seconds: f64,
    running: bool,
    generation: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    wake: Condvar,
    clock: Arc<dyn Clock>,
    callback: Mutex<TickCallback>,
    tick_lock: Mutex<()>,
}

/// Repeating timer with start/stop/change-interval and a next-tick query.
pub struct IntervalScheduler {
    shared: Arc<Shared>,
}

impl IntervalScheduler {
    /// Creates a stopped scheduler with the given period and time source.
    ///
    /// The tick callback does nothing until [`set_callback`](Self::set_callback) is called.
    #[must_use]
    pub fn new(interval_seconds: f64, clock: Arc<dyn Clock>) -> Self {
        let noop: TickCallback = Arc::new(|| {});
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    last_tick: None,
                    interval_seconds: sanitize_interval(interval_seconds),
                    running: false,
                    generation: 0,
                }),
                wake: Condvar::new(),
                clock,
                callback: Mutex::new(noop),
                tick_lock: Mutex::new(()),
            }),
        }
    }

    /// Replaces the tick callback.
    ///
    /// The callback must not hold a strong reference to this scheduler.
    pub fn set_callback(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.shared.callback.lock() = Arc::new(callback);
    }

    /// Starts the timer, or re-arms it from now if it is already running.
    pub fn start(&self) {
        let mut inner = self.shared.inner.lock();
        let generation = self.rearm_locked(&mut inner);
        let interval = inner.interval_seconds;
        drop(inner);

        self.shared.wake.notify_all();
        self.arm(generation, interval);
        tracing::debug!(interval_seconds = interval, "scheduler started");
    }

    /// Stops the timer. The last tick time is kept.
    ///
    /// A tick already in progress runs to completion.
    pub fn stop(&self) {
        let mut inner = self.shared.inner.lock();
        if !inner.running {
            return;
        }
        inner.running = false;
        inner.generation = inner.generation.wrapping_add(1);
        drop(inner);

        self.shared.wake.notify_all();
        tracing::debug!("scheduler stopped");
    }

    /// Changes the tick period. A running timer is re-armed from now.
    ///
    /// The period, the restart time and the generation change under one lock;
    /// a stopped scheduler is never restarted.
    pub fn change_interval(&self, interval_seconds: f64) {
        let interval_seconds = sanitize_interval(interval_seconds);

        let mut inner = self.shared.inner.lock();
        inner.interval_seconds = interval_seconds;
        if !inner.running {
            return;
        }
        let generation = self.rearm_locked(&mut inner);
        drop(inner);

        self.shared.wake.notify_all();
        self.arm(generation, interval_seconds);
        tracing::debug!(interval_seconds, "scheduler re-armed");
    }

    /// Returns whether the timer is armed.
    #[must_use]
    pub fn is_running(&self) -> bool { self.shared.inner.lock().running }

    /// Returns the tick period in seconds.
    #[must_use]
    pub fn interval_seconds(&self) -> f64 { self.shared.inner.lock().interval_seconds }

    /// Returns a snapshot of the scheduler state.
    #[must_use]
    pub fn state(&self) -> ScheduleState {
        let inner = self.shared.inner.lock();
        ScheduleState {
            last_tick: inner.last_tick,
            interval_seconds: inner.interval_seconds,
            running: inner.running,
        }
    }

    /// Returns `last_tick + interval`.
    ///
    /// `None` before the first start, or when the sum is out of calendar range.
    #[must_use]
    pub fn next_tick(&self) -> Option<DateTime<Local>> {
        let inner = self.shared.inner.lock();
        let last = inner.last_tick?;
        last.checked_add_signed(to_time_delta(inner.interval_seconds)?)
    }

    /// Formats the next tick for display.
    ///
    /// Returns `"Never"` before the first start, `HH:MM:SS` when the next tick
    /// falls on today's date and `DD/MM/YY HH:MM:SS` otherwise.
    #[must_use]
    pub fn next_tick_timestamp(&self) -> String {
        let Some(next) = self.next_tick() else {
            return NEVER.to_string();
        };

        if next.date_naive() == self.shared.clock.now().date_naive() {
            next.format("%H:%M:%S").to_string()
        } else {
            next.format("%d/%m/%y %H:%M:%S").to_string()
        }
    }

    /// Marks the timer running from now and retires older timer threads.
    fn rearm_locked(&self, inner: &mut Inner) -> u64 {
        inner.running = true;
        inner.last_tick = Some(self.shared.clock.now());
        inner.generation = inner.generation.wrapping_add(1);
        inner.generation
    }

    /// Spawns the timer thread for `generation`. A zero period never fires.
    fn arm(&self, generation: u64, interval_seconds: f64) {
        let Some(period) = Duration::try_from_secs_f64(interval_seconds).ok().filter(|d| !d.is_zero())
        else {
            tracing::debug!("scheduler interval is zero, timer will not fire");
            return;
        };

        let shared = Arc::clone(&self.shared);
        spawn_named_thread("scheduler", move || run_timer(&shared, generation, period));
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) { self.stop(); }
}

impl std::fmt::Debug for IntervalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalScheduler").field("state", &self.state()).finish()
    }
}

fn run_timer(shared: &Shared, generation: u64, period: Duration) {
    let Some(mut deadline) = Instant::now().checked_add(period) else {
        tracing::warn!(period = ?period, "scheduler interval too long, timer will not fire");
        return;
    };

    loop {
        let mut inner = shared.inner.lock();
        while inner.generation == generation && Instant::now() < deadline {
            shared.wake.wait_until(&mut inner, deadline);
        }
        if inner.generation != generation {
            return;
        }

        inner.last_tick = Some(shared.clock.now());
        drop(inner);

        // Ticks from an older generation may still be running.
        let _tick = shared.tick_lock.lock();
        if shared.inner.lock().generation != generation {
            return;
        }
        let callback = shared.callback.lock().clone();
        callback();

        let now = Instant::now();
        deadline = match deadline.checked_add(period) {
            Some(next) if next >= now => next,
            _ => match now.checked_add(period) {
                Some(next) => next,
                None => return,
            },
        };
    }
}

fn sanitize_interval(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 }
}

fn to_time_delta(seconds: f64) -> Option<TimeDelta> {
    Duration::try_from_secs_f64(seconds).ok().and_then(|duration| TimeDelta::from_std(duration).ok())
}
