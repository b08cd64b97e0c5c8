//! Core protocol types for Ghostguess's wire format.
//!
//! Everything in this module travels between the session and its clients:
//! the commands a client may send, the events the session pushes back, and
//! the full-state snapshot that is broadcast after every change.
//!
//! The engine (`ghostguess-game`) reuses the small enums defined here
//! ([`Phase`], [`LifeState`], [`DisplayStatus`]) so the snapshot never has to
//! translate between two parallel vocabularies.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies one client connection, and therefore one player.
///
/// A newtype over `u64` so a connection id can't be confused with a round
/// number or a secret number. `#[serde(transparent)]` keeps it a plain
/// number on the wire: `PlayerId(42)` is `42`, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// Session handlers return `(Recipient, ServerEvent)` pairs; the room actor
/// resolves the recipient against its connected clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected client, joined or not.
    All,

    /// A single connection.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Game vocabulary shared with the engine
// ---------------------------------------------------------------------------

/// The phase of the game.
///
/// ```text
/// Lobby ──start──→ Main ──expiry──→ Guess ──expiry──→ Main ...
///                   ▲                 │
///                   └──round advance──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Pre-game: players gather, nobody can guess.
    #[default]
    Lobby,
    /// Discussion window. No guessing.
    Main,
    /// Deadline window in which every living player must name their number.
    Guess,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Main => write!(f, "main"),
            Self::Guess => write!(f, "guess"),
        }
    }
}

/// Where a player stands in the ghost/revival lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifeState {
    /// Holds a secret number and must guess it each window.
    #[default]
    Alive,
    /// Failed once. Revives when their target stops being alive.
    Ghost,
    /// Out for good.
    Eliminated,
}

/// The label clients render next to a player's name.
///
/// Derived from [`LifeState`] plus the revival flag; the Spanish labels are
/// what the browser client matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Vivo,
    Fantasma,
    Eliminado,
    Revivido,
}

impl DisplayStatus {
    /// Maps a life state and revival flag to the label clients show.
    pub fn derive(life: LifeState, ever_revived: bool) -> Self {
        match (life, ever_revived) {
            (LifeState::Alive, false) => Self::Vivo,
            (LifeState::Alive, true) => Self::Revivido,
            (LifeState::Ghost, _) => Self::Fantasma,
            (LifeState::Eliminated, _) => Self::Eliminado,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One player as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub secret_number: Option<u8>,
    pub life: LifeState,
    pub ever_revived: bool,
    pub guessed_this_phase: bool,
    pub ghost_target: Option<PlayerId>,
    pub status: DisplayStatus,
}

/// The full session state broadcast after every handled command and tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Players in join order.
    pub players: Vec<PlayerView>,
    pub round: u32,
    pub phase: Phase,
    pub host: Option<PlayerId>,
    pub started: bool,
    /// Ticks left on the active countdown, 0 when none is armed.
    pub time_left: u32,
}

impl SessionSnapshot {
    /// Looks up a player by connection id.
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Commands a client may send.
///
/// Internally tagged, so a guess is `{"type": "Guess", "value": 7}`.
/// Disconnection is not a command: the gateway reports it when the
/// connection closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientCommand {
    /// Join the session under a display name.
    Join { name: String },
    /// Host only: leave the lobby and start round 1.
    StartGame,
    /// Host only: open the guess window right now.
    ForceAdvance,
    /// Host only: start the next round (revivals, fresh numbers).
    AdvanceRound,
    /// Name your own secret number.
    Guess { value: i64 },
    /// Host only: remove a player.
    Kick { target: PlayerId },
    /// Host only: wipe the session back to an empty lobby.
    Reset,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Why a join was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRejection {
    /// Another player already uses this exact name.
    NameTaken,
    /// Empty after trimming, or longer than the configured limit.
    InvalidName,
    /// Every secret number is in use.
    SessionFull,
}

impl fmt::Display for JoinRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTaken => write!(f, "name already in use"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::SessionFull => write!(f, "no secret numbers left"),
        }
    }
}

/// Events the session pushes to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Full state, after every change and every countdown tick.
    State { snapshot: SessionSnapshot },
    /// Direct: your ghost target fell and you are alive again.
    Revived,
    /// Direct: the host removed you.
    Kicked,
    /// Broadcast: the host reset the game; clear local state.
    ResetAll,
    /// Direct: your join was refused.
    JoinRejected { reason: JoinRejection },
}

// =========================================================================
// Tests
// =========================================================================
