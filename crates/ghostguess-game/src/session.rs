//! The game session: roster, round, phase, host and countdown.
//!
//! Every handler takes the sender's connection id, checks its
//! preconditions, mutates the session and returns the events to deliver.
//! A handler whose preconditions fail returns an empty outbox and leaves
//! the session untouched; a handler that changed anything ends its outbox
//! with a full-state broadcast.

use ghostguess_protocol::{
    ClientCommand, JoinRejection, Phase, PlayerId, Recipient, ServerEvent, SessionSnapshot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info};

use crate::{
    CountdownTick, ExpiryAction, GameConfig, GuessOutcome, NumberAllocator, PhaseScheduler, Player,
    PlayerLifecycle, Roster, TimerToken,
};

/// Events produced by one handler, in delivery order.
pub type Outbox = Vec<(Recipient, ServerEvent)>;

/// One game session.
///
/// Owned by exactly one caller (the room actor) and driven through `&mut
/// self`; there is no shared or global state.
pub struct GameSession {
    config: GameConfig,
    players: Roster,
    round: u32,
    phase: Phase,
    host: Option<PlayerId>,
    started: bool,
    scheduler: PhaseScheduler,
    lifecycle: PlayerLifecycle,
    rng: StdRng,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("players", &self.players.len())
            .field("round", &self.round)
            .field("phase", &self.phase)
            .field("host", &self.host)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Creates an empty lobby, seeded from the OS.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an empty lobby with a deterministic RNG.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let config = config.validated();
        let lifecycle = PlayerLifecycle::new(NumberAllocator::new(config.number_pool));
        Self {
            config,
            players: Roster::new(),
            round: 1,
            phase: Phase::Lobby,
            host: None,
            started: false,
            scheduler: PhaseScheduler::new(),
            lifecycle,
            rng,
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &Roster {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn host(&self) -> Option<PlayerId> {
        self.host
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Token of the armed countdown; the room presents it back on each tick.
    pub fn active_timer(&self) -> Option<TimerToken> {
        self.scheduler.token()
    }

    pub fn time_left(&self) -> u32 {
        self.scheduler.remaining()
    }

    /// The full state as sent to clients.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            players: self.players.iter().map(Player::view).collect(),
            round: self.round,
            phase: self.phase,
            host: self.host,
            started: self.started,
            time_left: self.time_left(),
        }
    }

    // -- Dispatch ---------------------------------------------------------

    /// Routes a decoded client command to its handler.
    pub fn handle(&mut self, sender: PlayerId, command: ClientCommand) -> Outbox {
        match command {
            ClientCommand::Join { name } => self.join(sender, &name),
            ClientCommand::StartGame => self.start_game(sender),
            ClientCommand::ForceAdvance => self.force_advance(sender),
            ClientCommand::AdvanceRound => self.advance_round(sender),
            ClientCommand::Guess { value } => self.guess(sender, value),
            ClientCommand::Kick { target } => self.kick(sender, target),
            ClientCommand::Reset => self.reset(sender),
        }
    }

    // -- Handlers ---------------------------------------------------------

    /// Seats `id` under `name` and deals them a number. The first player
    /// seated becomes host.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Outbox {
        let name = name.trim();
        if name.is_empty() {
            debug!(player = %id, "join with empty name dropped");
            return Vec::new();
        }
        if self.players.contains(id) {
            debug!(player = %id, "join from seated player dropped");
            return Vec::new();
        }
        if name.chars().count() > self.config.max_name_len {
            return vec![reject(id, JoinRejection::InvalidName)];
        }
        if self.players.name_taken(name) {
            debug!(player = %id, name, "join rejected, name taken");
            return vec![reject(id, JoinRejection::NameTaken)];
        }

        let number = match self.lifecycle.allocator().allocate(&self.players, &mut self.rng) {
            Ok(n) => n,
            Err(e) => {
                error!(player = %id, error = %e, "join rejected, no secret number left");
                return vec![reject(id, JoinRejection::SessionFull)];
            }
        };

        let mut player = Player::new(id, name);
        player.secret_number = Some(number);
        self.players.insert(player);
        if self.host.is_none() {
            self.host = Some(id);
        }
        info!(player = %id, name, players = self.players.len(), "player joined");

        vec![self.state_broadcast()]
    }

    /// Host only, once per game: everyone alive with a fresh number,
    /// round 1, discussion window opens.
    pub fn start_game(&mut self, sender: PlayerId) -> Outbox {
        if !self.is_host(sender) || self.started {
            debug!(player = %sender, "start dropped");
            return Vec::new();
        }

        for player in self.players.iter_mut() {
            player.restore_for_new_game();
        }
        for id in self.players.ids() {
            self.lifecycle.redraw_number(&mut self.players, id, &mut self.rng);
        }
        self.started = true;
        self.round = 1;
        info!(players = self.players.len(), "game started");
        self.enter_phase(Phase::Main);

        vec![self.state_broadcast()]
    }

    /// Host only: open the guess window now.
    pub fn force_advance(&mut self, sender: PlayerId) -> Outbox {
        if !self.is_host(sender) || !self.started {
            debug!(player = %sender, "force advance dropped");
            return Vec::new();
        }
        self.enter_phase(Phase::Guess);
        vec![self.state_broadcast()]
    }

    /// Host only: revivals, fresh numbers, next round, discussion window.
    pub fn advance_round(&mut self, sender: PlayerId) -> Outbox {
        if !self.is_host(sender) || !self.started {
            debug!(player = %sender, "round advance dropped");
            return Vec::new();
        }

        let revived = self.lifecycle.begin_round(&mut self.players, &mut self.rng);
        self.round += 1;
        info!(round = self.round, revived = revived.len(), "round advanced");
        self.enter_phase(Phase::Main);

        let mut out: Outbox = revived
            .into_iter()
            .map(|id| (Recipient::Player(id), ServerEvent::Revived))
            .collect();
        out.push(self.state_broadcast());
        out
    }

    /// `sender` names their number.
    pub fn guess(&mut self, sender: PlayerId, value: i64) -> Outbox {
        let outcome =
            self.lifecycle
                .apply_guess_outcome(&mut self.players, sender, value, self.phase, &mut self.rng);
        if outcome == GuessOutcome::Ignored {
            debug!(player = %sender, "guess dropped");
            return Vec::new();
        }
        vec![self.state_broadcast()]
    }

    /// Host only: remove `target` and tell them so.
    pub fn kick(&mut self, sender: PlayerId, target: PlayerId) -> Outbox {
        if !self.is_host(sender) || !self.players.contains(target) {
            debug!(player = %sender, target = %target, "kick dropped");
            return Vec::new();
        }
        self.remove_player(target);
        info!(host = %sender, target = %target, "player kicked");
        vec![(Recipient::Player(target), ServerEvent::Kicked), self.state_broadcast()]
    }

    /// Host only: back to an empty lobby.
    pub fn reset(&mut self, sender: PlayerId) -> Outbox {
        if !self.is_host(sender) {
            debug!(player = %sender, "reset dropped");
            return Vec::new();
        }

        // The scheduler survives so its generation keeps counting and
        // pre-reset tokens stay stale.
        self.scheduler.cancel();
        self.players.clear();
        self.round = 1;
        self.phase = Phase::Lobby;
        self.host = None;
        self.started = false;
        info!(host = %sender, "session reset");

        vec![(Recipient::All, ServerEvent::ResetAll), self.state_broadcast()]
    }

    /// The connection `id` went away.
    pub fn disconnect(&mut self, id: PlayerId) -> Outbox {
        if self.remove_player(id).is_none() {
            return Vec::new();
        }
        info!(player = %id, players = self.players.len(), "player disconnected");
        vec![self.state_broadcast()]
    }

    /// One countdown tick for the countdown identified by `token`.
    ///
    /// At zero the expiring phase's table entry decides what happens: the
    /// guess window fails everyone who stayed silent, then the successor
    /// phase is entered (arming its own countdown).
    pub fn tick(&mut self, token: TimerToken) -> Outbox {
        match self.scheduler.tick(token) {
            CountdownTick::Stale => Vec::new(),
            CountdownTick::Running { .. } => vec![self.state_broadcast()],
            CountdownTick::Expired { phase } => {
                if let Some(timing) = self.config.phase_timing(phase) {
                    if timing.on_expiry == ExpiryAction::ResolveGuesses {
                        let failed =
                            self.lifecycle.resolve_expired_guess_window(&mut self.players, &mut self.rng);
                        info!(round = self.round, failed = failed.len(), "guess window expired");
                    }
                    self.enter_phase(timing.successor);
                }
                vec![self.state_broadcast()]
            }
        }
    }

    // -- Internals --------------------------------------------------------

    fn is_host(&self, id: PlayerId) -> bool {
        self.host == Some(id)
    }

    /// The one way into a phase: set it, open a fresh guess window if it is
    /// `Guess`, and arm (or clear) the countdown from the phase table.
    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if phase == Phase::Guess {
            for player in self.players.iter_mut() {
                player.guessed_this_phase = false;
            }
        }
        match self.config.phase_timing(phase) {
            Some(timing) => {
                self.scheduler.arm(phase, timing.ticks);
            }
            None => {
                self.scheduler.cancel();
            }
        }
        info!(%phase, round = self.round, time_left = self.time_left(), "phase entered");
    }

    /// Unseats `id`, re-targets ghosts that were chasing them and hands the
    /// host role to the earliest-joined remaining player if needed.
    fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let removed = self.players.remove(id)?;
        self.lifecycle.retarget_ghosts_of(&mut self.players, id, &mut self.rng);
        if self.host == Some(id) {
            self.host = self.players.first();
            info!(new_host = ?self.host, "host reassigned");
        }
        Some(removed)
    }

    fn state_broadcast(&self) -> (Recipient, ServerEvent) {
        (
            Recipient::All,
            ServerEvent::State {
                snapshot: self.snapshot(),
            },
        )
    }
}

fn reject(id: PlayerId, reason: JoinRejection) -> (Recipient, ServerEvent) {
    (Recipient::Player(id), ServerEvent::JoinRejected { reason })
}
