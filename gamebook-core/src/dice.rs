//! Dice rolling for gamebook adventures.
//!
//! Every roll goes through the [`DiceSource`] seam: production code
//! uses [`RandomDice`] over a `rand` generator, tests substitute a
//! scripted source (see [`crate::testing`]) to control each face.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for dice rolling.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("dice count must be at least 1, got {0}")]
    InvalidDiceCount(u32),
    #[error("dice must have at least 2 sides, got {0}")]
    InvalidSides(u32),
}

/// A source of individual die results.
///
/// Implementations return a uniformly distributed integer in
/// `[1, sides]` and may assume `sides >= 2`.
pub trait DiceSource {
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Dice source backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng> {
    rng: R,
}

impl RandomDice<ThreadRng> {
    /// Dice backed by the thread-local generator.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomDice<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomDice<StdRng> {
    /// Deterministic dice from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomDice<R> {
    /// Wrap an existing generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DiceSource for RandomDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides)
    }
}

/// Complete result of a dice roll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
    /// Individual die faces, in the order rolled.
    pub rolls: Vec<u32>,
    pub total: u32,
}

/// Roll `count` dice with `sides` faces each and sum them.
///
/// `count` must be at least 1 and `sides` at least 2; anything else
/// is rejected with a [`DiceError`].
pub fn roll_dice_with(
    dice: &mut impl DiceSource,
    count: u32,
    sides: u32,
) -> Result<DiceRoll, DiceError> {
    if count < 1 {
        return Err(DiceError::InvalidDiceCount(count));
    }
    if sides < 2 {
        return Err(DiceError::InvalidSides(sides));
    }

    let rolls: Vec<u32> = (0..count).map(|_| dice.roll_die(sides)).collect();
    let total = rolls.iter().sum();

    Ok(DiceRoll {
        count,
        sides,
        rolls,
        total,
    })
}

/// Convenience form of [`roll_dice_with`] using the thread-local generator.
pub fn roll_dice(count: u32, sides: u32) -> Result<DiceRoll, DiceError> {
    roll_dice_with(&mut RandomDice::new(), count, sides)
}

/// Roll a single six-sided die.
pub fn roll_1d6_with(dice: &mut impl DiceSource) -> u32 {
    dice.roll_die(6)
}

/// Roll a single six-sided die with the thread-local generator.
pub fn roll_1d6() -> u32 {
    roll_1d6_with(&mut RandomDice::new())
}

/// Roll two independent six-sided dice and sum them.
pub fn roll_2d6_with(dice: &mut impl DiceSource) -> u32 {
    dice.roll_die(6) + dice.roll_die(6)
}

/// Roll two independent six-sided dice with the thread-local generator.
pub fn roll_2d6() -> u32 {
    roll_2d6_with(&mut RandomDice::new())
}
