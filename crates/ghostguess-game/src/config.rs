//! Game configuration and the phase table.

use ghostguess_protocol::Phase;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Tunables for one game session.
///
/// Durations are counted in countdown ticks; how long a tick lasts in real
/// time is the room's business (see `ghostguess-tick`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Secret numbers are drawn from `1..=number_pool`. This is also the
    /// most players the session can seat.
    pub number_pool: u8,

    /// Length of the discussion window.
    pub main_window_ticks: u32,

    /// Length of the guess window.
    pub guess_window_ticks: u32,

    /// Longest accepted display name, in characters.
    pub max_name_len: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            number_pool: 20,
            main_window_ticks: 900,
            guess_window_ticks: 60,
            max_name_len: 24,
        }
    }
}

impl GameConfig {
    /// Largest pool accepted by [`validated`](Self::validated).
    pub const MAX_NUMBER_POOL: u8 = 99;

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// - `number_pool` to `1..=MAX_NUMBER_POOL`
    /// - both windows to at least one tick
    /// - `max_name_len` to at least one character
    pub fn validated(mut self) -> Self {
        let pool = self.number_pool.clamp(1, Self::MAX_NUMBER_POOL);
        if pool != self.number_pool {
            warn!(pool = self.number_pool, clamped = pool, "number_pool out of range, clamping");
            self.number_pool = pool;
        }
        if self.main_window_ticks == 0 {
            warn!("main_window_ticks is 0, using 1");
            self.main_window_ticks = 1;
        }
        if self.guess_window_ticks == 0 {
            warn!("guess_window_ticks is 0, using 1");
            self.guess_window_ticks = 1;
        }
        if self.max_name_len == 0 {
            warn!("max_name_len is 0, using 1");
            self.max_name_len = 1;
        }
        self
    }

    /// The phase table: how long `phase` lasts, where its countdown leads,
    /// and what runs when it runs out. `None` means the phase has no
    /// deadline.
    ///
    /// ```text
    /// phase   ticks               successor  on expiry
    /// Lobby   -                   -          -
    /// Main    main_window_ticks   Guess      nothing
    /// Guess   guess_window_ticks  Main       resolve unanswered guesses
    /// ```
    pub fn phase_timing(&self, phase: Phase) -> Option<PhaseTiming> {
        match phase {
            Phase::Lobby => None,
            Phase::Main => Some(PhaseTiming {
                ticks: self.main_window_ticks,
                successor: Phase::Guess,
                on_expiry: ExpiryAction::Nothing,
            }),
            Phase::Guess => Some(PhaseTiming {
                ticks: self.guess_window_ticks,
                successor: Phase::Main,
                on_expiry: ExpiryAction::ResolveGuesses,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// PhaseTiming
// ---------------------------------------------------------------------------

/// One row of the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTiming {
    /// Countdown length armed on entering the phase.
    pub ticks: u32,
    /// Phase entered when the countdown reaches zero.
    pub successor: Phase,
    /// Work done at expiry, before the successor is entered.
    pub on_expiry: ExpiryAction,
}

/// What a phase does when its countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryAction {
    Nothing,
    /// Everyone still alive who has not guessed fails, as if wrong.
    ResolveGuesses,
}
