//! Guess outcomes, ghost targets and revival.
//!
//! ```text
//!            wrong guess / timeout             target no longer alive
//!   Alive ───────────────────────────→ Ghost ─────────────────────────→ Alive (revived)
//!     │  (never revived)                                                    │
//!     │                                                                     │ wrong guess / timeout
//!     └──── wrong guess / timeout (revived before) ──→ Eliminated ←─────────┘
//! ```
//!
//! Everything here operates on a [`Roster`] handed in by the session; the
//! rules hold no state besides the allocator.

use ghostguess_protocol::{LifeState, Phase, PlayerId};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, error, info};

use crate::{NumberAllocator, Roster};

/// What a guess (or a missed deadline) did to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Preconditions not met; nothing changed.
    Ignored,
    /// Right number: safe for this window.
    Correct,
    /// First failure: now a ghost, possibly with a target.
    Ghosted { target: Option<PlayerId> },
    /// Failure after a revival: out for good.
    Eliminated,
}

/// The player-lifecycle rules.
#[derive(Debug, Clone, Copy)]
pub struct PlayerLifecycle {
    allocator: NumberAllocator,
}

impl PlayerLifecycle {
    pub fn new(allocator: NumberAllocator) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &NumberAllocator {
        &self.allocator
    }

    /// Applies `guessed` as `id`'s answer.
    ///
    /// Ignored unless the phase is `Guess`, the player is alive and has not
    /// already guessed this window.
    pub fn apply_guess_outcome<R: Rng + ?Sized>(
        &self,
        players: &mut Roster,
        id: PlayerId,
        guessed: i64,
        phase: Phase,
        rng: &mut R,
    ) -> GuessOutcome {
        if phase != Phase::Guess {
            return GuessOutcome::Ignored;
        }
        let Some(player) = players.get_mut(id) else {
            return GuessOutcome::Ignored;
        };
        if !player.is_alive() || player.guessed_this_phase {
            return GuessOutcome::Ignored;
        }

        if player.secret_number.map(i64::from) == Some(guessed) {
            player.guessed_this_phase = true;
            debug!(player = %id, "correct guess");
            GuessOutcome::Correct
        } else {
            self.fail(players, id, rng)
        }
    }

    /// The failure branch shared by wrong guesses and timeouts.
    ///
    /// Never-revived players become ghosts; revived players are eliminated.
    pub fn fail<R: Rng + ?Sized>(&self, players: &mut Roster, id: PlayerId, rng: &mut R) -> GuessOutcome {
        let Some(player) = players.get_mut(id).filter(|p| p.is_alive()) else {
            return GuessOutcome::Ignored;
        };

        if player.ever_revived {
            player.life = LifeState::Eliminated;
            player.ghost_target = None;
            info!(player = %id, "player eliminated");
            GuessOutcome::Eliminated
        } else {
            player.life = LifeState::Ghost;
            let target = self.assign_ghost_target(players, id, rng);
            info!(player = %id, target = ?target, "player became a ghost");
            GuessOutcome::Ghosted { target }
        }
    }

    /// Picks a target for ghost `ghost_id` among the other players that are
    /// alive or were ever revived. With no candidate the target stays unset
    /// and the ghost has no way back for now.
    pub fn assign_ghost_target<R: Rng + ?Sized>(
        &self,
        players: &mut Roster,
        ghost_id: PlayerId,
        rng: &mut R,
    ) -> Option<PlayerId> {
        let candidates: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.id != ghost_id && p.is_target_candidate())
            .map(|p| p.id)
            .collect();
        let target = candidates.choose(rng).copied();

        let ghost = players.get_mut(ghost_id)?;
        if ghost.life != LifeState::Ghost {
            return None;
        }
        ghost.ghost_target = target;
        target
    }

    /// Whether ghost `id` has earned its revival: its target is set and is
    /// no longer alive.
    pub fn revival_due(&self, players: &Roster, id: PlayerId) -> bool {
        let Some(ghost) = players.get(id) else {
            return false;
        };
        if ghost.life != LifeState::Ghost {
            return false;
        }
        ghost
            .ghost_target
            .and_then(|target| players.get(target))
            .is_some_and(|target| !target.is_alive())
    }

    /// Revives ghost `id` if its revival is due. Returns `true` when it did;
    /// the caller owes that player a direct notification.
    pub fn try_revive<R: Rng + ?Sized>(&self, players: &mut Roster, id: PlayerId, rng: &mut R) -> bool {
        if !self.revival_due(players, id) {
            return false;
        }
        self.revive(players, id, rng);
        true
    }

    fn revive<R: Rng + ?Sized>(&self, players: &mut Roster, id: PlayerId, rng: &mut R) {
        let Some(player) = players.get_mut(id) else {
            return;
        };
        player.life = LifeState::Alive;
        player.ever_revived = true;
        player.guessed_this_phase = false;
        player.ghost_target = None;
        self.redraw_number(players, id, rng);
        info!(player = %id, "ghost revived");
    }

    /// Fails every living player who let the guess window run out.
    pub fn resolve_expired_guess_window<R: Rng + ?Sized>(
        &self,
        players: &mut Roster,
        rng: &mut R,
    ) -> Vec<(PlayerId, GuessOutcome)> {
        let silent: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.is_alive() && !p.guessed_this_phase)
            .map(|p| p.id)
            .collect();

        silent
            .into_iter()
            .map(|id| (id, self.fail(players, id, rng)))
            .collect()
    }

    /// Round start: walk the roster in join order reviving each ghost whose
    /// target is not alive at that moment, then hand every other living
    /// player a fresh number.
    ///
    /// A ghost revived early in the pass counts as alive for the ghosts
    /// checked after it. Returns the revived players, in join order.
    pub fn begin_round<R: Rng + ?Sized>(&self, players: &mut Roster, rng: &mut R) -> Vec<PlayerId> {
        let mut revived = Vec::new();
        for id in players.ids() {
            if self.try_revive(players, id, rng) {
                revived.push(id);
            }
        }

        let living: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.is_alive() && !revived.contains(&p.id))
            .map(|p| p.id)
            .collect();
        for id in living {
            if let Some(player) = players.get_mut(id) {
                player.guessed_this_phase = false;
            }
            self.redraw_number(players, id, rng);
        }

        revived
    }

    /// Gives every ghost that was chasing `departed` a new target.
    pub fn retarget_ghosts_of<R: Rng + ?Sized>(&self, players: &mut Roster, departed: PlayerId, rng: &mut R) {
        let orphans: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.ghost_target == Some(departed))
            .map(|p| p.id)
            .collect();
        for ghost in orphans {
            let target = self.assign_ghost_target(players, ghost, rng);
            debug!(ghost = %ghost, departed = %departed, target = ?target, "ghost re-targeted");
        }
    }

    /// Releases `id`'s number and draws a new one, preferably different.
    /// On an exhausted pool the player is left without a number.
    pub fn redraw_number<R: Rng + ?Sized>(&self, players: &mut Roster, id: PlayerId, rng: &mut R) {
        let Some(player) = players.get_mut(id) else {
            return;
        };
        let previous = player.secret_number.take();

        let drawn = match self.allocator.allocate_avoiding(players, previous, rng) {
            Ok(n) => Some(n),
            Err(e) => {
                error!(player = %id, error = %e, "could not draw a secret number");
                None
            }
        };
        if let Some(player) = players.get_mut(id) {
            player.secret_number = drawn;
        }
    }
}
