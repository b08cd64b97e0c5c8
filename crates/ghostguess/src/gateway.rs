//! `Gateway` builder and per-connection plumbing.
//!
//! The gateway is what a transport talks to. It hands out connection ids,
//! turns inbound frames into commands for the session actor and turns the
//! actor's events back into frames. Sockets themselves live outside this
//! crate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ghostguess_game::GameConfig;
use ghostguess_protocol::{ClientCommand, Codec, JsonCodec, PlayerId, ServerEvent};
use ghostguess_room::{RoomConfig, RoomHandle, spawn_room};
use ghostguess_tick::TickConfig;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::GhostguessError;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a Ghostguess session.
///
/// ```rust,no_run
/// # async fn run() {
/// use ghostguess::prelude::*;
///
/// let gateway = Gateway::builder()
///     .tick_interval(std::time::Duration::from_secs(1))
///     .build();
/// let conn = gateway.connect().await.unwrap();
/// gateway.receive(conn.id(), br#"{"type":"Join","name":"ana"}"#).await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GatewayBuilder {
    config: RoomConfig,
}

impl GatewayBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the game rules and window lengths.
    pub fn game_config(mut self, game: GameConfig) -> Self {
        self.config.game = game;
        self
    }

    /// Sets the real-time length of one countdown tick.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick = TickConfig {
            interval,
            ..self.config.tick
        };
        self
    }

    /// Fixes the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Spawns the session actor with the JSON codec.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(self) -> Gateway<JsonCodec> {
        self.build_with_codec(JsonCodec)
    }

    /// Spawns the session actor with a custom codec.
    pub fn build_with_codec<C: Codec>(self, codec: C) -> Gateway<C> {
        let room = spawn_room(self.config);
        info!("ghostguess session started");
        Gateway::new(room, codec)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Front door of one session.
///
/// Connection ids come from a monotonic counter and are never reused, so a
/// late frame from a closed connection can never be mistaken for a newer
/// one.
pub struct Gateway<C: Codec = JsonCodec> {
    room: RoomHandle,
    codec: C,
    next_id: AtomicU64,
}

impl Gateway<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }
}

impl<C: Codec> Gateway<C> {
    /// Wraps an already-running room.
    pub fn new(room: RoomHandle, codec: C) -> Self {
        Self {
            room,
            codec,
            next_id: AtomicU64::new(1),
        }
    }

    /// The underlying room handle.
    pub fn room(&self) -> &RoomHandle {
        &self.room
    }

    /// Opens a connection. Its first event is the current state.
    pub async fn connect(&self) -> Result<Connection, GhostguessError> {
        let id = PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.room.connect(id, tx).await?;
        debug!(connection = %id, "connection opened");
        Ok(Connection { id, events: rx })
    }

    /// Feeds one inbound frame from connection `id`.
    ///
    /// Frames that do not decode to a command are logged and dropped; only
    /// a stopped session is an error.
    pub async fn receive(&self, id: PlayerId, frame: &[u8]) -> Result<(), GhostguessError> {
        let cmd: ClientCommand = match self.codec.decode(frame) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!(connection = %id, error = %e, "undecodable frame dropped");
                return Ok(());
            }
        };
        self.room.send_command(id, cmd).await?;
        Ok(())
    }

    /// Reports that connection `id` closed.
    pub async fn disconnect(&self, id: PlayerId) -> Result<(), GhostguessError> {
        self.room.disconnect(id).await?;
        debug!(connection = %id, "connection closed");
        Ok(())
    }

    /// Encodes one event as a frame.
    pub fn encode(&self, event: &ServerEvent) -> Result<Vec<u8>, GhostguessError> {
        Ok(self.codec.encode(event)?)
    }

    /// Waits for the next event on `conn` and encodes it. `Ok(None)` once
    /// the session has stopped.
    pub async fn next_frame(&self, conn: &mut Connection) -> Result<Option<Vec<u8>>, GhostguessError> {
        match conn.recv().await {
            Some(event) => self.encode(&event).map(Some),
            None => Ok(None),
        }
    }

    /// Stops the session actor.
    pub async fn shutdown(&self) -> Result<(), GhostguessError> {
        self.room.shutdown().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// One open connection: its id and its outbound event stream.
#[derive(Debug)]
pub struct Connection {
    id: PlayerId,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Connection {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Next event for this connection; `None` once the session stopped.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.events.try_recv().ok()
    }
}
