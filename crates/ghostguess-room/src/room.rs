//! Room actor: one Tokio task that owns the game session.
//!
//! Commands arrive through a bounded mpsc channel and are applied one at a
//! time, so the session never needs a lock. The countdown clock is just a
//! second branch of the same `select!`, polled only while the session has a
//! countdown armed.

use std::collections::HashMap;

use ghostguess_game::{GameSession, Outbox, TimerToken};
use ghostguess_protocol::{ClientCommand, PlayerId, Recipient, ServerEvent, SessionSnapshot};
use ghostguess_tick::TickScheduler;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{RoomConfig, RoomError};

/// Channel sender for delivering events to one connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` expect a reply; the rest are
/// fire-and-forget.
pub(crate) enum RoomCommand {
    /// Register a connection's outbound channel.
    Connect {
        id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// The connection closed.
    Disconnect { id: PlayerId },

    /// A decoded client command.
    Command { sender: PlayerId, cmd: ClientCommand },

    /// Request the current session state.
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },

    /// Stop the actor.
    Shutdown,
}

/// Handle to the running room actor.
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Registers connection `id`. The connection immediately receives the
    /// current state and, from then on, every broadcast.
    pub async fn connect(&self, id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Connect {
                id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Reports that connection `id` closed.
    pub async fn disconnect(&self, id: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { id })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Queues a client command from `sender` (fire-and-forget).
    pub async fn send_command(&self, sender: PlayerId, cmd: ClientCommand) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Command { sender, cmd })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// The session state as of every command queued before this call.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    session: GameSession,
    ticker: TickScheduler,
    /// Token of the countdown the ticker is currently pacing.
    armed: Option<TimerToken>,
    /// Outbound channels of every open connection, joined or not.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        info!("room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                _ = self.ticker.wait_for_tick(), if self.armed.is_some() => {
                    self.on_tick();
                }
            }
            self.sync_ticker();
        }

        info!(
            connections = self.senders.len(),
            ticks = self.ticker.tick_count(),
            overruns = self.ticker.total_overruns(),
            "room actor stopped"
        );
    }

    /// Applies one command. Returns `false` on shutdown.
    fn handle(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Connect { id, sender, reply } => {
                let result = self.handle_connect(id, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Disconnect { id } => {
                if self.senders.remove(&id).is_some() {
                    debug!(connection = %id, "connection closed");
                }
                let out = self.session.disconnect(id);
                self.dispatch(out);
            }
            RoomCommand::Command { sender, cmd } => {
                if !self.senders.contains_key(&sender) {
                    warn!(connection = %sender, "command from unknown connection, ignoring");
                    return true;
                }
                let out = self.session.handle(sender, cmd);
                self.dispatch(out);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            RoomCommand::Shutdown => {
                info!("room shutting down");
                return false;
            }
        }
        true
    }

    fn handle_connect(&mut self, id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        if self.senders.contains_key(&id) {
            return Err(RoomError::AlreadyConnected(id));
        }
        let _ = sender.send(ServerEvent::State {
            snapshot: self.session.snapshot(),
        });
        self.senders.insert(id, sender);
        debug!(connection = %id, connections = self.senders.len(), "connection registered");
        Ok(())
    }

    fn on_tick(&mut self) {
        let Some(token) = self.armed else {
            return;
        };
        let out = self.session.tick(token);
        self.dispatch(out);
    }

    /// Keeps the ticker in step with the session's countdown: a fresh
    /// countdown restarts the clock, no countdown stops it.
    fn sync_ticker(&mut self) {
        let current = self.session.active_timer();
        if current == self.armed {
            return;
        }
        self.armed = current;
        match current {
            Some(_) => self.ticker.restart(),
            None => self.ticker.stop(),
        }
    }

    /// Delivers events to their recipients. Broadcasts reach every open
    /// connection, joined or not.
    fn dispatch(&self, out: Outbox) {
        for (recipient, event) in out {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(id) => {
                    if let Some(sender) = self.senders.get(&id) {
                        let _ = sender.send(event);
                    }
                }
            }
        }
    }
}

/// Spawns the room actor and returns a handle to it.
///
/// Must be called inside a Tokio runtime.
pub fn spawn_room(config: RoomConfig) -> RoomHandle {
    let config = config.validated();
    let (tx, rx) = mpsc::channel(config.channel_size);

    let session = match config.seed {
        Some(seed) => GameSession::with_seed(config.game, seed),
        None => GameSession::new(config.game),
    };

    let actor = RoomActor {
        session,
        ticker: TickScheduler::new(config.tick),
        armed: None,
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { sender: tx }
}
