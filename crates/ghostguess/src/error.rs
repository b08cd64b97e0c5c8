//! Unified error type for Ghostguess.

use ghostguess_game::GameError;
use ghostguess_protocol::ProtocolError;
use ghostguess_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates `From` impls, so `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GhostguessError {
    /// A protocol-level error (encode, decode, invalid frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session actor is gone or refused the connection.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A fault inside the game engine.
    #[error(transparent)]
    Game(#[from] GameError),
}
