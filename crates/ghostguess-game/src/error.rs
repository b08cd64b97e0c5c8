//! Error types for the game engine.

/// Errors raised by the engine.
///
/// Commands with unmet preconditions are not errors: they are dropped and
/// produce no events. This enum only covers faults the server itself has to
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Every secret number in the pool is held by some player.
    ///
    /// Retrying cannot help; the caller decides whether to leave the
    /// player numberless or refuse the operation.
    #[error("secret number pool 1..={pool} is exhausted")]
    PoolExhausted { pool: u8 },
}
