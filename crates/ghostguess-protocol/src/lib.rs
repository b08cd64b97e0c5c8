//! Wire protocol for Ghostguess.
//!
//! This crate defines what clients and the session say to each other:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`SessionSnapshot`], ...):
//!   the messages and the state snapshot that travel on the wire, plus the
//!   small game vocabulary ([`Phase`], [`LifeState`]) the engine shares.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about connections, timers or rules.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientCommand) → Room actor → Game session
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, DisplayStatus, JoinRejection, LifeState, Phase, PlayerId,
    PlayerView, Recipient, ServerEvent, SessionSnapshot,
};
