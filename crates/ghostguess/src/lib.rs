//! # Ghostguess
//!
//! Server for a real-time party game: every player holds a secret number,
//! discusses, then must name their own number before the guess window
//! closes. A miss turns a player into a ghost that comes back to life when
//! the player it chases falls; a second miss after that is final.
//!
//! The crate ties the layers together:
//!
//! ```text
//! Transport (bytes) → Gateway (Codec) → Room actor (queue + clock) → GameSession
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghostguess::prelude::*;
//!
//! # async fn run() -> Result<(), GhostguessError> {
//! ghostguess::logging::init();
//!
//! let gateway = Gateway::builder().build();
//! let mut conn = gateway.connect().await?;
//! gateway.receive(conn.id(), br#"{"type":"Join","name":"ana"}"#).await?;
//! while let Some(frame) = gateway.next_frame(&mut conn).await? {
//!     // write `frame` to the socket
//!     # let _ = frame;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod gateway;
pub mod logging;

pub use error::GhostguessError;
pub use gateway::{Connection, Gateway, GatewayBuilder};

pub use ghostguess_game as game;
pub use ghostguess_protocol as protocol;
pub use ghostguess_room as room;
pub use ghostguess_tick as tick;

pub mod prelude {
    pub use crate::{Connection, Gateway, GatewayBuilder, GhostguessError};
    pub use ghostguess_game::GameConfig;
    pub use ghostguess_protocol::{
        ClientCommand, Codec, JsonCodec, Phase, PlayerId, ServerEvent, SessionSnapshot,
    };
    pub use ghostguess_room::RoomConfig;
    pub use ghostguess_tick::{TickConfig, TickPolicy};
}
