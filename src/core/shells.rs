//! The shell sequence: an ordered multiset of live/blank rounds.
//!
//! Shells are consumed strictly from the front (index 0). A fresh sequence
//! is a true random permutation of an exact live/blank multiset, never a
//! series of independent coin flips.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rng::GameRng;

/// Ordered live/blank rounds, front = next to fire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShellSequence {
    shells: SmallVec<[bool; 8]>,
}

impl ShellSequence {
    /// Draw a fresh sequence: exactly `live` live rounds among `total`,
    /// uniformly permuted.
    #[must_use]
    pub fn draw(live: u8, total: u8, rng: &mut GameRng) -> Self {
        debug_assert!(live <= total);
        let mut shells: SmallVec<[bool; 8]> = SmallVec::new();
        for i in 0..total {
            shells.push(i < live);
        }
        rng.shuffle(&mut shells);
        Self { shells }
    }

    /// Build from an explicit front-first ordering.
    #[must_use]
    pub fn from_slice(shells: &[bool]) -> Self {
        Self {
            shells: SmallVec::from_slice(shells),
        }
    }

    /// The front shell, if any.
    #[must_use]
    pub fn peek(&self) -> Option<bool> {
        self.shells.first().copied()
    }

    /// Remove and return the front shell.
    pub fn pop_front(&mut self) -> Option<bool> {
        if self.shells.is_empty() {
            return None;
        }
        Some(self.shells.remove(0))
    }

    /// Flip the front shell's identity in place. Returns the new value.
    pub fn invert_front(&mut self) -> Option<bool> {
        let front = self.shells.first_mut()?;
        *front = !*front;
        Some(*front)
    }

    /// The shell at `index` (0 = front), if present.
    #[must_use]
    pub fn reveal(&self, index: usize) -> Option<bool> {
        self.shells.get(index).copied()
    }

    /// Number of live rounds remaining.
    #[must_use]
    pub fn live_count(&self) -> u8 {
        self.shells.iter().filter(|&&s| s).count() as u8
    }

    /// Total rounds remaining.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.shells.len() as u8
    }

    /// Whether the sequence is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Front-first contents.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.shells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_has_exact_composition() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            let seq = ShellSequence::draw(3, 7, &mut rng);
            assert_eq!(seq.live_count(), 3);
            assert_eq!(seq.total(), 7);
        }
    }

    #[test]
    fn test_pop_front_consumes_in_order() {
        let mut seq = ShellSequence::from_slice(&[true, false, true]);

        assert_eq!(seq.peek(), Some(true));
        assert_eq!(seq.pop_front(), Some(true));
        assert_eq!(seq.pop_front(), Some(false));
        assert_eq!(seq.pop_front(), Some(true));
        assert_eq!(seq.pop_front(), None);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_invert_front() {
        let mut seq = ShellSequence::from_slice(&[false, true]);

        assert_eq!(seq.invert_front(), Some(true));
        assert_eq!(seq.peek(), Some(true));
        assert_eq!(seq.live_count(), 2);
    }

    #[test]
    fn test_invert_empty_is_none() {
        let mut seq = ShellSequence::default();
        assert_eq!(seq.invert_front(), None);
    }

    #[test]
    fn test_reveal_does_not_consume() {
        let seq = ShellSequence::from_slice(&[true, false, true, false]);

        assert_eq!(seq.reveal(2), Some(true));
        assert_eq!(seq.reveal(4), None);
        assert_eq!(seq.total(), 4);
    }

    #[test]
    fn test_draw_is_seed_deterministic() {
        let mut rng1 = GameRng::new(9);
        let mut rng2 = GameRng::new(9);

        let a = ShellSequence::draw(2, 6, &mut rng1);
        let b = ShellSequence::draw(2, 6, &mut rng2);
        assert_eq!(a, b);
    }
}
