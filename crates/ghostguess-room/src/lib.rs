//! Session actor for Ghostguess.
//!
//! The game session runs as an isolated Tokio task (actor model) that owns
//! the [`GameSession`](ghostguess_game::GameSession), the countdown clock
//! and the outbound channel of every connection.
//!
//! # Key types
//!
//! - [`spawn_room`]: start the actor
//! - [`RoomHandle`]: send commands to the running actor
//! - [`RoomConfig`]: queue size, tick pacing, game rules

mod config;
mod error;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use room::{PlayerSender, RoomHandle, spawn_room};
