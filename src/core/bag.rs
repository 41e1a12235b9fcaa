//! Bag module - 7-bag random piece generation
//!
//! Implements the shuffled-bag scheme: each bag holds one of every kind,
//! shuffled with Fisher-Yates, drained before the next bag is generated.
//! Across any bag-aligned run of 7 draws every kind appears exactly once;
//! there is no ordering guarantee across bag boundaries.
//!
//! The randomizer is an explicit owned instance, reseedable per game, so
//! the engine stays deterministic and replayable.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (used to reseed a follow-up session)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SevenBag {
    /// Remaining pieces of the current bag, drained from the back
    bag: ArrayVec<PieceKind, 7>,
    rng: SimpleRng,
}

impl SevenBag {
    /// Create an empty bag; the first `next()` call triggers a refill
    pub fn new(seed: u32) -> Self {
        Self {
            bag: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Refill with a uniformly random permutation of all seven kinds
    fn refill(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.rng.shuffle(&mut self.bag);
    }

    /// Draw the next piece kind
    pub fn next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill();
        }
        // Non-empty after refill; drain from the back.
        self.bag.pop().unwrap_or(PieceKind::I)
    }

    /// Remaining draws until the current bag is exhausted
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Current RNG state (for reseeding the next session)
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for SevenBag {
    fn default() -> Self {
        Self::new(1)
    }
}
