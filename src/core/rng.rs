//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical shuffles
//! - **Serializable**: O(1) state capture and restore via the ChaCha8
//!   word position
//! - **Context streams**: Independent sequences for different purposes
//!
//! The RNG lives inside [`Game`](crate::state::Game), so snapshot/undo
//! restores it along with everything else and a replayed game deals the
//! same decks.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};

/// Deterministic RNG used for all deck shuffling.
///
/// Uses ChaCha8 for speed while maintaining high quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// Used to shuffle the species decks independently of the main deck:
    /// the same context always produces the same stream from the same
    /// seed, so adding a species never perturbs the main deck order.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

impl Eq for GameRng {}

impl Serialize for GameRng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = GameRngState::deserialize(deserializer)?;
        Ok(GameRng::from_state(&state))
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let mut a = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut b = a.clone();
        rng1.shuffle(&mut a);
        rng2.shuffle(&mut b);

        assert_eq!(a, b);
    }

    #[test]
    fn test_context_streams_are_independent_and_stable() {
        let rng = GameRng::new(42);
        let mut deck1 = rng.for_context("species:0");
        let mut deck2 = rng.for_context("species:1");
        let mut deck1_again = GameRng::new(42).for_context("species:0");

        let mut a: Vec<_> = (0..20).collect();
        let mut b = a.clone();
        let mut c = a.clone();
        deck1.shuffle(&mut a);
        deck2.shuffle(&mut b);
        deck1_again.shuffle(&mut c);

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(7);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        rng.shuffle(&mut data);

        data.sort_unstable();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_state_round_trip_continues_sequence() {
        let mut rng = GameRng::new(42);
        let mut burn: Vec<_> = (0..50).collect();
        rng.shuffle(&mut burn);

        let state = rng.state();
        let mut restored = GameRng::from_state(&state);

        let mut expected: Vec<_> = (0..10).collect();
        let mut actual = expected.clone();
        rng.shuffle(&mut expected);
        restored.shuffle(&mut actual);

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut rng = GameRng::new(99);
        let mut burn: Vec<_> = (0..8).collect();
        rng.shuffle(&mut burn);

        let json = serde_json::to_string(&rng).unwrap();
        let back: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(rng, back);
    }
}
