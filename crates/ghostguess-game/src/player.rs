//! Player records and the join-ordered roster.

use ghostguess_protocol::{DisplayStatus, LifeState, PlayerId, PlayerView};

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One seated player.
///
/// Fields are crate-private: only the lifecycle rules and the session may
/// change them, which is what keeps the invariants in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) secret_number: Option<u8>,
    pub(crate) life: LifeState,
    pub(crate) ever_revived: bool,
    pub(crate) guessed_this_phase: bool,
    pub(crate) ghost_target: Option<PlayerId>,
}

impl Player {
    /// A fresh, living player with no number yet.
    pub(crate) fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            secret_number: None,
            life: LifeState::Alive,
            ever_revived: false,
            guessed_this_phase: false,
            ghost_target: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret_number(&self) -> Option<u8> {
        self.secret_number
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn ever_revived(&self) -> bool {
        self.ever_revived
    }

    pub fn guessed_this_phase(&self) -> bool {
        self.guessed_this_phase
    }

    pub fn ghost_target(&self) -> Option<PlayerId> {
        self.ghost_target
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    /// Whether this player can be handed to a ghost as its target:
    /// alive, or revived at some point (even if since eliminated).
    pub fn is_target_candidate(&self) -> bool {
        self.is_alive() || self.ever_revived
    }

    pub fn display_status(&self) -> DisplayStatus {
        DisplayStatus::derive(self.life, self.ever_revived)
    }

    /// Back to a clean living state for a new game. Keeps the number;
    /// the caller re-draws it.
    pub(crate) fn restore_for_new_game(&mut self) {
        self.life = LifeState::Alive;
        self.ever_revived = false;
        self.guessed_this_phase = false;
        self.ghost_target = None;
    }

    /// The wire view of this player.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            secret_number: self.secret_number,
            life: self.life,
            ever_revived: self.ever_revived,
            guessed_this_phase: self.guessed_this_phase,
            ghost_target: self.ghost_target,
            status: self.display_status(),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Seated players in join order.
///
/// Join order matters for host succession, so this is a `Vec` rather than
/// a map; sessions hold at most `number_pool` players.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Exact, case-sensitive name match.
    pub fn name_taken(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    /// Ids in join order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// The earliest-joined player still seated.
    pub fn first(&self) -> Option<PlayerId> {
        self.players.first().map(|p| p.id)
    }

    /// Every secret number currently held.
    pub fn held_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.players.iter().filter_map(|p| p.secret_number)
    }

    pub(crate) fn insert(&mut self, player: Player) {
        self.players.push(player);
    }

    pub(crate) fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.players.clear();
    }
}
