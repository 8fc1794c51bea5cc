//! RNG module - deterministic tile generation
//!
//! Spawned tiles draw one of the canonical [`PATTERNS`] uniformly, then turn it
//! right a uniform 0..=5 times. The random source is a trait so tests can
//! script exact draws; [`SimpleRng`] is the seeded default.

use tracing::debug;

use crate::tile::Tile;
use crate::types::{TileId, EDGE_COUNT};
use crate::wiring::{Wiring, PATTERNS};

/// Source of uniform integers.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, max)`. `max` must be non-zero.
    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero seed would get stuck on the increment alone
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG cycle quickly; hand out the high half.
        self.state >> 16
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

/// Produces fresh player tiles.
pub struct TileSpawner {
    rng: Box<dyn RandomSource>,
    next_id: u32,
}

impl TileSpawner {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self { rng, next_id: 1 }
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::new(Box::new(SimpleRng::new(seed)))
    }

    /// Pick a canonical pattern and a random orientation for it.
    pub fn next_wiring(&mut self) -> Wiring {
        let pattern = self.rng.next_range(PATTERNS.len() as u32) as usize;
        let turns = self.rng.next_range(EDGE_COUNT as u32) as usize;
        PATTERNS[pattern].rotated_right(turns)
    }

    /// Allocate a tile id. Static level tiles draw from the same sequence.
    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A new unplaced, rotatable tile.
    pub fn spawn(&mut self) -> Tile {
        let wiring = self.next_wiring();
        let tile = Tile::new(self.next_id(), wiring);
        debug!(tile = %tile.id, wiring = %wiring.to_digits(), "tile spawned");
        tile
    }
}

impl std::fmt::Debug for TileSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSpawner")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
