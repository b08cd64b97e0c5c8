//! Error types for the room layer.

use ghostguess_protocol::PlayerId;

/// Errors returned by [`RoomHandle`](crate::RoomHandle) calls.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A connection with this id is already registered.
    #[error("connection {0} is already registered")]
    AlreadyConnected(PlayerId),

    /// The room's command channel is closed: the actor has stopped.
    #[error("room is unavailable")]
    Unavailable,
}
