//! The single phase countdown.
//!
//! A session has at most one countdown. Arming a new one replaces the old
//! and mints a new [`TimerToken`]; a tick must present the token of the
//! countdown it was meant for, so a tick scheduled for a replaced countdown
//! can never touch the new one.

use ghostguess_protocol::Phase;
use tracing::trace;

/// Identifies one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// The countdown currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub token: TimerToken,
    /// The phase whose window this countdown times.
    pub phase: Phase,
    pub remaining: u32,
}

/// Result of presenting a tick to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// The token does not match the armed countdown (or none is armed).
    Stale,
    /// One tick consumed, time remains.
    Running { remaining: u32 },
    /// The countdown reached zero and has been cleared.
    Expired { phase: Phase },
}

/// Owns the session's countdown slot.
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    active: Option<Countdown>,
    generation: u64,
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a countdown of `ticks` for `phase`, replacing any other.
    pub fn arm(&mut self, phase: Phase, ticks: u32) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.active = Some(Countdown {
            token,
            phase,
            remaining: ticks.max(1),
        });
        trace!(generation = self.generation, %phase, ticks, "countdown armed");
        token
    }

    /// Clears the slot. Tokens handed out so far all become stale.
    pub fn cancel(&mut self) -> Option<Countdown> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&Countdown> {
        self.active.as_ref()
    }

    /// Token of the armed countdown, if any.
    pub fn token(&self) -> Option<TimerToken> {
        self.active.map(|c| c.token)
    }

    /// Ticks left, 0 when nothing is armed.
    pub fn remaining(&self) -> u32 {
        self.active.map_or(0, |c| c.remaining)
    }

    /// Consumes one tick of the countdown identified by `token`.
    pub fn tick(&mut self, token: TimerToken) -> CountdownTick {
        let Some(countdown) = self.active.as_mut().filter(|c| c.token == token) else {
            return CountdownTick::Stale;
        };

        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return CountdownTick::Running {
                remaining: countdown.remaining,
            };
        }

        let phase = countdown.phase;
        self.active = None;
        CountdownTick::Expired { phase }
    }
}
