//! Room configuration.

use ghostguess_game::GameConfig;
use ghostguess_tick::TickConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for the session actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of the command queue. Callers wait when it is full.
    pub channel_size: usize,

    /// Real-time length of one countdown tick, and what to do when late.
    pub tick: TickConfig,

    /// Rules and windows for the session itself.
    pub game: GameConfig,

    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            tick: TickConfig::default(),
            game: GameConfig::default(),
            seed: None,
        }
    }
}

impl RoomConfig {
    /// Clamp out-of-range values, including the nested tick and game
    /// configs.
    pub fn validated(mut self) -> Self {
        if self.channel_size == 0 {
            warn!("channel_size is 0, using 1");
            self.channel_size = 1;
        }
        self.tick = self.tick.validated();
        self.game = self.game.validated();
        self
    }
}
