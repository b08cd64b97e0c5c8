//! Countdown pacing clock for Ghostguess.
//!
//! The game counts its phase windows in ticks. This crate decides *when* a
//! tick happens: one per fixed interval (one second by default), only while
//! a countdown is running, with an explicit policy for ticks that fire late.
//!
//! # Stopped clock
//!
//! A stopped scheduler's [`TickScheduler::wait_for_tick`] pends forever, so
//! a room actor can keep it in its `select!` loop even when no countdown is
//! armed.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands, maybe restart */ }
//!         _ = scheduler.wait_for_tick() => {
//!             let events = session.tick(token);
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a tick fires later than scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickPolicy {
    /// Forget the missed ticks and resume one interval from now.
    /// A stalled process shortens nobody's countdown.
    #[default]
    Skip,
    /// Fire up to `max_catchup` missed ticks back to back so the countdown
    /// keeps pace with wall-clock time.
    ///
    /// Every burst tick counts down the running phase window, so after a
    /// stall players lose that many seconds of discussion or guessing at
    /// once. Prefer `Skip` unless wall-clock deadlines matter more.
    CatchUp {
        /// Hard cap on consecutive catch-up ticks.
        max_catchup: u32,
    },
    /// Keep the original cadence without reporting skipped ticks.
    Drop,
}

/// Configuration for the tick scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Real time between two countdown ticks.
    pub interval: Duration,
    /// Late-tick handling.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// Shortest interval accepted.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);
    /// Longest interval accepted.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(60);

    /// Create a config with a specific interval and the default policy.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        let clamped = self.interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL);
        if clamped != self.interval {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                clamped_ms = clamped.as_millis() as u64,
                "tick interval out of range, clamping"
            );
            self.interval = clamped;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Ticks fired since this scheduler was created (starts at 1).
    pub tick: u64,
    /// `true` if the tick fired more than 10% of an interval late.
    pub overrun: bool,
    /// Ticks that were skipped because of the lateness (0 normally).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval tick source for one session's countdown.
///
/// Created stopped. [`restart`](Self::restart) whenever a fresh countdown
/// is armed, [`stop`](Self::stop) when none is.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire; `None` while stopped.
    next_tick: Option<Instant>,
    total_overruns: u64,
    total_skipped: u64,
}

impl TickScheduler {
    /// Create a stopped scheduler from config.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            interval_ms = config.interval.as_millis() as u64,
            policy = ?config.policy,
            "tick scheduler created"
        );
        Self {
            config,
            tick_count: 0,
            next_tick: None,
            total_overruns: 0,
            total_skipped: 0,
        }
    }

    /// Create a stopped scheduler ticking at `interval` with default policy.
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(TickConfig::with_interval(interval))
    }

    /// Start (or restart) the clock: the next tick fires one full interval
    /// from now, whatever was scheduled before.
    pub fn restart(&mut self) {
        self.next_tick = Some(Instant::now() + self.config.interval);
        trace!(tick = self.tick_count, "tick scheduler restarted");
    }

    /// Stop the clock. `wait_for_tick` pends until the next `restart`.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            trace!(tick = self.tick_count, "tick scheduler stopped");
        }
    }

    /// Whether a tick is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Wait until the next tick is due.
    ///
    /// While stopped this future never resolves; `tokio::select!` keeps
    /// serving its other branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };
        let interval = self.config.interval;

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10;
        let behind = (late_by.as_nanos() / interval.as_nanos()) as u64;
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun && behind > 0 {
                    ticks_skipped = behind;
                    warn!(
                        tick = self.tick_count,
                        skipped = behind,
                        late_ms = late_by.as_millis() as u64,
                        "countdown tick late, skipping ahead"
                    );
                }
                now + interval
            }
            TickPolicy::CatchUp { max_catchup } => {
                if overrun && behind > 0 {
                    ticks_skipped = behind.saturating_sub(u64::from(max_catchup));
                    warn!(
                        tick = self.tick_count,
                        behind,
                        skipping = ticks_skipped,
                        "countdown tick late, catching up"
                    );
                    if behind <= u64::from(max_catchup) {
                        next + interval
                    } else {
                        now + interval
                    }
                } else {
                    next + interval
                }
            }
            TickPolicy::Drop => next + interval,
        });

        if overrun {
            self.total_overruns += 1;
        }
        self.total_skipped += ticks_skipped;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks that fired late.
    pub fn total_overruns(&self) -> u64 {
        self.total_overruns
    }

    /// Ticks skipped over the scheduler's lifetime.
    pub fn total_skipped(&self) -> u64 {
        self.total_skipped
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// The configured late-tick policy.
    pub fn policy(&self) -> TickPolicy {
        self.config.policy
    }
}
