//! Character statistics for adventure sheets.

use crate::dice::{roll_1d6_with, roll_2d6_with, DiceSource, RandomDice};
use serde::{Deserialize, Serialize};

/// A character's three core statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub skill: i32,
    pub stamina: i32,
    pub luck: i32,
}

impl CharacterStats {
    /// Roll fresh starting statistics with the given dice source.
    ///
    /// Skill is 6 + 1d6 (7-12), stamina 12 + 2d6 (14-24), luck
    /// 6 + 1d6 (7-12).
    pub fn roll_with(dice: &mut impl DiceSource) -> Self {
        Self {
            skill: 6 + roll_1d6_with(dice) as i32,
            stamina: 12 + roll_2d6_with(dice) as i32,
            luck: 6 + roll_1d6_with(dice) as i32,
        }
    }

    /// Roll fresh starting statistics with the thread-local generator.
    pub fn roll() -> Self {
        Self::roll_with(&mut RandomDice::new())
    }

    /// Check the statistics against the rollable ranges.
    ///
    /// Returns a boolean rather than an error: callers branch on it
    /// when accepting hand-entered sheets.
    pub fn is_valid(&self) -> bool {
        (7..=12).contains(&self.skill)
            && (14..=24).contains(&self.stamina)
            && (7..=12).contains(&self.luck)
    }
}

/// Validate a (skill, stamina, luck) triple against the rollable ranges.
pub fn validate_character_stats(skill: i32, stamina: i32, luck: i32) -> bool {
    CharacterStats {
        skill,
        stamina,
        luck,
    }
    .is_valid()
}
