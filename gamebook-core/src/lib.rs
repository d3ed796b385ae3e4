//! Gamebook adventure engine: dice rolling and turn-based combat.
//!
//! This crate provides:
//! - Dice rolling through an injectable [`DiceSource`] seam
//! - Character statistic generation and validation
//! - A pure combat state machine (attack-strength comparison with an
//!   optional luck test) advanced one round at a time
//!
//! # Quick Start
//!
//! ```
//! use gamebook_core::{execute_round, start_combat, CharacterStats};
//!
//! let stats = CharacterStats::roll();
//! let mut state = start_combat("Goblin", 6, 5, stats.skill, stats.stamina, stats.luck);
//!
//! while state.is_active() {
//!     let (round, next) = execute_round(&state, false)?;
//!     println!(
//!         "round {}: {} vs {}",
//!         round.round_number, round.player_attack_strength, round.monster_attack_strength
//!     );
//!     state = next;
//! }
//! # Ok::<(), gamebook_core::CombatError>(())
//! ```
//!
//! The engine owns no storage: the caller keeps each round's returned
//! [`CombatState`] (persisting it however it likes) and feeds it to
//! the next [`execute_round`] call.

pub mod combat;
pub mod dice;
pub mod stats;
pub mod testing;

// Primary public API
pub use combat::{
    execute_round, execute_round_with, start_combat, CombatError, CombatPhase, CombatRoundResult,
    CombatState, DicePair, LuckTest, Winner,
};
pub use dice::{
    roll_1d6, roll_2d6, roll_dice, roll_dice_with, DiceError, DiceRoll, DiceSource, RandomDice,
};
pub use stats::{validate_character_stats, CharacterStats};
