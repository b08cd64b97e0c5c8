//! Secret-number allocation.
//!
//! Numbers come from `1..=pool`. A number is free when no seated player
//! holds it, which is the only place uniqueness is decided.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{GameError, Roster};

/// Draws unique secret numbers from a fixed pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberAllocator {
    pool: u8,
}

impl NumberAllocator {
    pub fn new(pool: u8) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> u8 {
        self.pool
    }

    /// Numbers in the pool that no player holds, ascending.
    pub fn free_numbers(&self, players: &Roster) -> Vec<u8> {
        let mut taken = vec![false; usize::from(self.pool) + 1];
        for n in players.held_numbers() {
            if let Some(slot) = taken.get_mut(usize::from(n)) {
                *slot = true;
            }
        }
        (1..=self.pool).filter(|n| !taken[usize::from(*n)]).collect()
    }

    /// A free number, chosen uniformly at random.
    ///
    /// # Errors
    /// [`GameError::PoolExhausted`] when every number is held.
    pub fn allocate<R: Rng + ?Sized>(&self, players: &Roster, rng: &mut R) -> Result<u8, GameError> {
        self.allocate_avoiding(players, None, rng)
    }

    /// Like [`allocate`](Self::allocate), but steers clear of `previous`
    /// (the number the player just gave up) unless it is the only one free.
    ///
    /// # Errors
    /// [`GameError::PoolExhausted`] when every number is held.
    pub fn allocate_avoiding<R: Rng + ?Sized>(
        &self,
        players: &Roster,
        previous: Option<u8>,
        rng: &mut R,
    ) -> Result<u8, GameError> {
        let free = self.free_numbers(players);
        let preferred: Vec<u8> = free.iter().copied().filter(|n| Some(*n) != previous).collect();
        let candidates = if preferred.is_empty() { &free } else { &preferred };

        candidates
            .choose(rng)
            .copied()
            .ok_or(GameError::PoolExhausted { pool: self.pool })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;
    use ghostguess_protocol::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn holding(numbers: &[u8]) -> Roster {
        let mut roster = Roster::new();
        for (i, n) in numbers.iter().enumerate() {
            let mut p = Player::new(PlayerId(i as u64 + 1), format!("p{i}"));
            p.secret_number = Some(*n);
            roster.insert(p);
        }
        roster
    }

    #[test]
    fn test_free_numbers_excludes_held() {
        let alloc = NumberAllocator::new(5);
        assert_eq!(alloc.free_numbers(&holding(&[2, 4])), vec![1, 3, 5]);
    }

    #[test]
    fn test_allocate_picks_a_free_number() {
        let alloc = NumberAllocator::new(20);
        let roster = holding(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = alloc.allocate(&roster, &mut rng).unwrap();
            assert!((4..=20).contains(&n));
        }
    }

    #[test]
    fn test_allocate_last_free_number() {
        let alloc = NumberAllocator::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(alloc.allocate(&holding(&[1, 3]), &mut rng), Ok(2));
    }

    #[test]
    fn test_allocate_exhausted_pool_fails() {
        let alloc = NumberAllocator::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            alloc.allocate(&holding(&[1, 2, 3]), &mut rng),
            Err(GameError::PoolExhausted { pool: 3 })
        );
    }

    #[test]
    fn test_allocate_avoiding_skips_previous_when_possible() {
        let alloc = NumberAllocator::new(3);
        let roster = holding(&[1]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(alloc.allocate_avoiding(&roster, Some(2), &mut rng), Ok(3));
        }
    }

    #[test]
    fn test_allocate_avoiding_falls_back_to_previous() {
        let alloc = NumberAllocator::new(2);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(alloc.allocate_avoiding(&holding(&[1]), Some(2), &mut rng), Ok(2));
    }
}
