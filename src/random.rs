//! Randomness seam for tile spawning.
//!
//! The board never touches a generator directly. It asks a [`RandomSource`]
//! for two things per spawn: which free cell (by index into the row-major
//! list of empty cells) and which value. Two implementations ship here:
//!
//! - [`RngSource`]: owns a `rand` generator and a [`SpawnPolicy`].
//! - [`ScriptedSource`]: replays fixed sequences, for tests and replays.
//!
//! ```
//! use game2048::random::{RandomSource, RngSource};
//!
//! let mut src = RngSource::seeded(7);
//! let idx = src.pick_free_cell_index(16);
//! assert!(idx < 16);
//! let v = src.pick_spawn_value();
//! assert!(v == 2 || v == 4);
//! ```

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::EngineError;

/// Supplies the two random draws needed to spawn a tile.
pub trait RandomSource {
    /// Index into the currently empty cells, in `[0, free_count)`.
    ///
    /// Only called with `free_count > 0`.
    fn pick_free_cell_index(&mut self, free_count: usize) -> usize;

    /// Value of the next spawned tile (2 or 4 under the default policy).
    fn pick_spawn_value(&mut self) -> u32;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    #[inline]
    fn pick_free_cell_index(&mut self, free_count: usize) -> usize {
        (**self).pick_free_cell_index(free_count)
    }

    #[inline]
    fn pick_spawn_value(&mut self) -> u32 {
        (**self).pick_spawn_value()
    }
}

/// Distribution of spawned tile values: a 4 one time in `four_in`, otherwise a 2.
///
/// The default (`four_in = 9`) draws uniformly from `[0, 9)` and spawns a 4
/// only on a zero draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SpawnPolicyRepr")]
pub struct SpawnPolicy {
    four_in: u32,
}

impl SpawnPolicy {
    pub const DEFAULT_FOUR_IN: u32 = 9;

    pub fn new(four_in: u32) -> Result<Self, EngineError> {
        if four_in == 0 {
            return Err(EngineError::InvalidSpawnOdds);
        }
        Ok(Self { four_in })
    }

    #[inline]
    pub fn four_in(&self) -> u32 {
        self.four_in
    }

    /// Map a uniform draw in `[0, four_in)` to a tile value.
    #[inline]
    pub fn value_for_draw(&self, draw: u32) -> u32 {
        if draw == 0 {
            4
        } else {
            2
        }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.value_for_draw(rng.gen_range(0..self.four_in))
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self { four_in: Self::DEFAULT_FOUR_IN }
    }
}

#[derive(Deserialize)]
struct SpawnPolicyRepr {
    #[serde(default = "default_four_in")]
    four_in: u32,
}

fn default_four_in() -> u32 {
    SpawnPolicy::DEFAULT_FOUR_IN
}

impl TryFrom<SpawnPolicyRepr> for SpawnPolicy {
    type Error = EngineError;

    fn try_from(repr: SpawnPolicyRepr) -> Result<Self, Self::Error> {
        SpawnPolicy::new(repr.four_in)
    }
}

/// Production source: an owned generator plus a spawn policy.
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
    policy: SpawnPolicy,
}

impl RngSource<StdRng> {
    /// Seed a `StdRng` from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy(), SpawnPolicy::default())
    }

    /// Reproducible source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), SpawnPolicy::default())
    }
}

impl<R: Rng> RngSource<R> {
    pub fn with_rng(rng: R, policy: SpawnPolicy) -> Self {
        Self { rng, policy }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick_free_cell_index(&mut self, free_count: usize) -> usize {
        assert!(free_count > 0, "pick_free_cell_index called on a full board");
        self.rng.gen_range(0..free_count)
    }

    fn pick_spawn_value(&mut self) -> u32 {
        self.policy.sample(&mut self.rng)
    }
}

/// Replays fixed position and value sequences.
///
/// Each draw consumes the next scripted entry; once a sequence is down to its
/// last entry, that entry is returned for every further draw. Drawing from an
/// empty sequence panics.
///
/// ```
/// use game2048::random::{RandomSource, ScriptedSource};
///
/// let mut src = ScriptedSource::new([3, 9], [4, 2]);
/// assert_eq!(src.pick_free_cell_index(16), 3);
/// assert_eq!(src.pick_free_cell_index(15), 9);
/// assert_eq!(src.pick_free_cell_index(14), 9);
/// assert_eq!(src.pick_spawn_value(), 4);
/// assert_eq!(src.pick_spawn_value(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    positions: VecDeque<usize>,
    values: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new<P, V>(positions: P, values: V) -> Self
    where
        P: IntoIterator<Item = usize>,
        V: IntoIterator<Item = u32>,
    {
        Self {
            positions: positions.into_iter().collect(),
            values: values.into_iter().collect(),
        }
    }
}

fn next_repeating<T: Copy>(queue: &mut VecDeque<T>, what: &str) -> T {
    if queue.len() > 1 {
        if let Some(item) = queue.pop_front() {
            return item;
        }
    }
    match queue.front() {
        Some(&item) => item,
        None => panic!("scripted source has no {what} to replay"),
    }
}

impl RandomSource for ScriptedSource {
    fn pick_free_cell_index(&mut self, _free_count: usize) -> usize {
        next_repeating(&mut self.positions, "positions")
    }

    fn pick_spawn_value(&mut self) -> u32 {
        next_repeating(&mut self.values, "values")
    }
}
