//! Ghostguess game engine.
//!
//! A pure, synchronous state machine. [`GameSession`] takes a sender and a
//! command, applies the rules and hands back an [`Outbox`] of events; it
//! never touches sockets or clocks. Timing reaches it only as tick calls
//! carrying a [`TimerToken`], which the room actor feeds in.
//!
//! - [`NumberAllocator`]: unique secret numbers from `1..=pool`
//! - [`PlayerLifecycle`]: guesses, ghosts, targets, revival
//! - [`PhaseScheduler`]: the one countdown and its tokens
//! - [`GameSession`]: the session record and every command handler

mod allocator;
mod config;
mod error;
mod lifecycle;
mod player;
mod scheduler;
mod session;

pub use allocator::NumberAllocator;
pub use config::{ExpiryAction, GameConfig, PhaseTiming};
pub use error::GameError;
pub use lifecycle::{GuessOutcome, PlayerLifecycle};
pub use player::{Player, Roster};
pub use scheduler::{Countdown, CountdownTick, PhaseScheduler, TimerToken};
pub use session::{GameSession, Outbox};
