//! Turn-based combat resolution.
//!
//! A fight is a sequence of rounds. Each round, both sides roll two
//! dice and add their skill; the lower attack strength takes damage,
//! and the player may spend a point of luck to swing that damage
//! either way. Combat runs until one side (or both in the same round)
//! is out of stamina.
//!
//! The engine is pure: [`start_combat`] builds the initial state, and
//! each [`execute_round`] call consumes a state and returns the
//! round's outcome plus the successor state. The caller owns storage
//! and must feed each round the previous round's output.

use std::cmp::Ordering;
use std::fmt;

use crate::dice::{DiceSource, RandomDice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base damage dealt to the losing side of a round.
const BASE_DAMAGE: i32 = 2;

/// Errors from combat resolution.
#[derive(Debug, Error)]
pub enum CombatError {
    /// [`execute_round`] was called on a state whose fight is over.
    #[error("combat has already ended (winner: {winner})")]
    CombatEnded { winner: Winner },
}

/// The side a round or a whole fight went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Monster,
    /// Equal attack strengths in a round, or both sides knocked out
    /// in the same round.
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Winner::Player => "player",
            Winner::Monster => "monster",
            Winner::Draw => "draw",
        };
        write!(f, "{name}")
    }
}

/// Whether a fight is still running.
///
/// A winner exists only once the fight has ended, so a finished fight
/// cannot be mistaken for a running one (or vice versa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CombatPhase {
    Active,
    Ended { winner: Winner },
}

/// Snapshot of an in-progress or finished fight.
///
/// Created once per fight by [`start_combat`]; every
/// [`execute_round`] call consumes one state and returns the next.
/// States serialize cleanly so callers can round-trip them through
/// storage between rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    pub monster_name: String,
    pub monster_skill: i32,
    /// Current monster health; saturates at 0.
    pub monster_stamina: i32,
    /// Monster health at the start of the fight.
    pub monster_max_stamina: i32,
    pub player_skill: i32,
    /// Current player health; saturates at 0.
    pub player_stamina: i32,
    /// Remaining luck; spent by 1 on every luck attempt.
    pub player_luck: i32,
    /// Player luck at the start of the fight.
    pub player_max_luck: i32,
    /// Starts at 1 and increments after every executed round,
    /// including the final one.
    pub round_number: u32,
    pub phase: CombatPhase,
}

impl CombatState {
    /// True while neither side has been reduced to zero stamina.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, CombatPhase::Active)
    }

    /// The overall winner, once the fight has ended.
    pub fn winner(&self) -> Option<Winner> {
        match self.phase {
            CombatPhase::Active => None,
            CombatPhase::Ended { winner } => Some(winner),
        }
    }
}

/// Two dice rolled together for one side of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePair {
    pub first: u32,
    pub second: u32,
}

impl DicePair {
    fn roll(dice: &mut impl DiceSource) -> Self {
        Self {
            first: dice.roll_die(6),
            second: dice.roll_die(6),
        }
    }

    pub fn total(&self) -> u32 {
        self.first + self.second
    }
}

/// Outcome of a luck test: 2d6 rolled against the player's current luck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckTest {
    pub dice: DicePair,
    /// True when the dice total was at most the player's luck.
    pub success: bool,
}

/// Immutable record of exactly one round's resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatRoundResult {
    /// The round this result resolved.
    pub round_number: u32,
    pub player_dice: DicePair,
    pub monster_dice: DicePair,
    /// Player skill plus the player's dice total.
    pub player_attack_strength: i32,
    /// Monster skill plus the monster's dice total.
    pub monster_attack_strength: i32,
    pub round_winner: Winner,
    /// The caller's request flag, echoed as given. A request made with
    /// zero luck remaining is silently skipped: this stays true but no
    /// luck dice are drawn and `luck_test` stays `None`.
    pub luck_attempted: bool,
    pub luck_test: Option<LuckTest>,
    pub damage_to_player: i32,
    pub damage_to_monster: i32,
    pub player_stamina_after: i32,
    pub monster_stamina_after: i32,
    pub player_luck_after: i32,
    /// True when this round ended the fight.
    pub combat_ended: bool,
    pub combat_winner: Option<Winner>,
}

/// Build the initial state for a fight against a monster.
///
/// Stats are taken as-is: a fight started with zero or negative
/// stamina on either side is still `Active`, and the first executed
/// round then ends it through the normal knockout rule.
pub fn start_combat(
    monster_name: impl Into<String>,
    monster_skill: i32,
    monster_stamina: i32,
    player_skill: i32,
    player_stamina: i32,
    player_luck: i32,
) -> CombatState {
    CombatState {
        monster_name: monster_name.into(),
        monster_skill,
        monster_stamina,
        monster_max_stamina: monster_stamina,
        player_skill,
        player_stamina,
        player_luck,
        player_max_luck: player_luck,
        round_number: 1,
        phase: CombatPhase::Active,
    }
}

/// Resolve one round of combat with the given dice source.
///
/// Returns the round's resolution and the successor state. The round
/// either fully resolves or fails without executing: the only error
/// is calling this on a fight that already ended.
pub fn execute_round_with(
    state: &CombatState,
    attempt_luck: bool,
    dice: &mut impl DiceSource,
) -> Result<(CombatRoundResult, CombatState), CombatError> {
    if let CombatPhase::Ended { winner } = state.phase {
        return Err(CombatError::CombatEnded { winner });
    }

    let player_dice = DicePair::roll(dice);
    let monster_dice = DicePair::roll(dice);
    let player_attack_strength = state.player_skill + player_dice.total() as i32;
    let monster_attack_strength = state.monster_skill + monster_dice.total() as i32;

    let round_winner = match player_attack_strength.cmp(&monster_attack_strength) {
        Ordering::Greater => Winner::Player,
        Ordering::Less => Winner::Monster,
        Ordering::Equal => Winner::Draw,
    };

    // The losing side takes 2 base damage; a drawn round deals none.
    let (mut damage_to_player, mut damage_to_monster) = match round_winner {
        Winner::Player => (0, BASE_DAMAGE),
        Winner::Monster => (BASE_DAMAGE, 0),
        Winner::Draw => (0, 0),
    };

    // A luck attempt with no luck left is silently skipped; the
    // request flag is still echoed in the result.
    let mut player_luck_after = state.player_luck;
    let mut luck_test = None;
    if attempt_luck && state.player_luck > 0 {
        let luck_dice = DicePair::roll(dice);
        let success = luck_dice.total() as i32 <= state.player_luck;

        // Luck is spent whether or not the test succeeds.
        player_luck_after = (state.player_luck - 1).max(0);

        match (round_winner, success) {
            (Winner::Player, true) => damage_to_monster += 1,
            (Winner::Player, false) => damage_to_monster = (damage_to_monster - 1).max(0),
            (Winner::Monster, true) => damage_to_player = (damage_to_player - 1).max(0),
            (Winner::Monster, false) => damage_to_player += 1,
            // A drawn round dealt no damage for luck to swing.
            (Winner::Draw, _) => {}
        }

        luck_test = Some(LuckTest {
            dice: luck_dice,
            success,
        });
    }

    let player_stamina_after = (state.player_stamina - damage_to_player).max(0);
    let monster_stamina_after = (state.monster_stamina - damage_to_monster).max(0);

    // Simultaneous knockout is a draw, never a player win.
    let combat_winner = if player_stamina_after <= 0 && monster_stamina_after <= 0 {
        Some(Winner::Draw)
    } else if player_stamina_after <= 0 {
        Some(Winner::Monster)
    } else if monster_stamina_after <= 0 {
        Some(Winner::Player)
    } else {
        None
    };

    let result = CombatRoundResult {
        round_number: state.round_number,
        player_dice,
        monster_dice,
        player_attack_strength,
        monster_attack_strength,
        round_winner,
        luck_attempted: attempt_luck,
        luck_test,
        damage_to_player,
        damage_to_monster,
        player_stamina_after,
        monster_stamina_after,
        player_luck_after,
        combat_ended: combat_winner.is_some(),
        combat_winner,
    };

    let next = CombatState {
        monster_name: state.monster_name.clone(),
        monster_skill: state.monster_skill,
        monster_stamina: monster_stamina_after,
        monster_max_stamina: state.monster_max_stamina,
        player_skill: state.player_skill,
        player_stamina: player_stamina_after,
        player_luck: player_luck_after,
        player_max_luck: state.player_max_luck,
        round_number: state.round_number + 1,
        phase: match combat_winner {
            Some(winner) => CombatPhase::Ended { winner },
            None => CombatPhase::Active,
        },
    };

    Ok((result, next))
}

/// Convenience form of [`execute_round_with`] using the thread-local
/// generator.
pub fn execute_round(
    state: &CombatState,
    attempt_luck: bool,
) -> Result<(CombatRoundResult, CombatState), CombatError> {
    execute_round_with(state, attempt_luck, &mut RandomDice::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    fn goblin_fight() -> CombatState {
        start_combat("Goblin", 6, 5, 8, 16, 9)
    }

    #[test]
    fn test_start_combat_initial_state() {
        let state = goblin_fight();
        assert_eq!(state.monster_name, "Goblin");
        assert_eq!(state.monster_stamina, 5);
        assert_eq!(state.monster_max_stamina, 5);
        assert_eq!(state.player_luck, 9);
        assert_eq!(state.player_max_luck, 9);
        assert_eq!(state.round_number, 1);
        assert!(state.is_active());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_player_wins_round_without_luck() {
        let state = goblin_fight();
        // player 6+6, monster 1+1
        let mut dice = ScriptedDice::new([6, 6, 1, 1]);
        let (round, next) = execute_round_with(&state, false, &mut dice).unwrap();

        assert_eq!(round.round_number, 1);
        assert_eq!(round.player_attack_strength, 20);
        assert_eq!(round.monster_attack_strength, 8);
        assert_eq!(round.round_winner, Winner::Player);
        assert_eq!(round.damage_to_monster, 2);
        assert_eq!(round.damage_to_player, 0);
        assert!(!round.luck_attempted);
        assert!(round.luck_test.is_none());
        assert_eq!(round.player_luck_after, 9);

        assert_eq!(next.monster_stamina, state.monster_stamina - 2);
        assert_eq!(next.player_stamina, state.player_stamina);
        assert_eq!(next.round_number, 2);
        assert!(next.is_active());
    }

    #[test]
    fn test_drawn_round_deals_no_damage() {
        let state = start_combat("Orc", 8, 6, 8, 16, 9);
        let mut dice = ScriptedDice::new([3, 4, 2, 5]);
        let (round, next) = execute_round_with(&state, false, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Draw);
        assert_eq!(round.damage_to_player, 0);
        assert_eq!(round.damage_to_monster, 0);
        assert!(!round.combat_ended);
        assert_eq!(next.player_stamina, 16);
        assert_eq!(next.monster_stamina, 6);
        assert!(next.is_active());
    }

    #[test]
    fn test_luck_attempt_skipped_at_zero_luck() {
        let state = start_combat("Ghoul", 8, 7, 6, 10, 0);
        // monster wins; only the four attack dice may be drawn
        let mut dice = ScriptedDice::new([1, 1, 6, 6]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(dice.remaining(), 0);
        assert!(round.luck_attempted);
        assert!(round.luck_test.is_none());
        assert_eq!(round.damage_to_player, 2);
        assert_eq!(round.player_luck_after, 0);
        assert_eq!(next.player_luck, 0);
    }

    #[test]
    fn test_player_win_with_successful_luck() {
        let state = goblin_fight();
        // attack dice, then a luck roll of 2 against luck 9
        let mut dice = ScriptedDice::new([6, 6, 1, 1, 1, 1]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Player);
        let luck = round.luck_test.unwrap();
        assert!(luck.success);
        assert_eq!(round.damage_to_monster, 3);
        assert_eq!(round.player_luck_after, 8);
        assert_eq!(next.monster_stamina, 2);
        assert_eq!(next.player_luck, 8);
    }

    #[test]
    fn test_player_win_with_failed_luck() {
        let state = goblin_fight();
        // luck roll of 12 against luck 9 fails
        let mut dice = ScriptedDice::new([6, 6, 1, 1, 6, 6]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Player);
        let luck = round.luck_test.unwrap();
        assert!(!luck.success);
        assert_eq!(round.damage_to_monster, 1);
        // luck is spent even on failure
        assert_eq!(round.player_luck_after, 8);
        assert_eq!(next.monster_stamina, 4);
    }

    #[test]
    fn test_monster_win_with_successful_luck() {
        let state = goblin_fight();
        let mut dice = ScriptedDice::new([1, 1, 6, 6, 2, 2]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Monster);
        assert!(round.luck_test.unwrap().success);
        assert_eq!(round.damage_to_player, 1);
        assert_eq!(next.player_stamina, 15);
    }

    #[test]
    fn test_monster_win_with_failed_luck() {
        let state = goblin_fight();
        let mut dice = ScriptedDice::new([1, 1, 6, 6, 5, 6]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Monster);
        assert!(!round.luck_test.unwrap().success);
        assert_eq!(round.damage_to_player, 3);
        assert_eq!(next.player_stamina, 13);
    }

    #[test]
    fn test_drawn_round_ignores_luck_outcome() {
        let state = start_combat("Orc", 8, 6, 8, 16, 9);
        let mut dice = ScriptedDice::new([3, 4, 2, 5, 1, 1]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Draw);
        assert!(round.luck_test.unwrap().success);
        assert_eq!(round.damage_to_player, 0);
        assert_eq!(round.damage_to_monster, 0);
        // the attempt still costs a point of luck
        assert_eq!(round.player_luck_after, 8);
        assert_eq!(next.player_luck, 8);
    }

    #[test]
    fn test_player_knockout_ends_combat() {
        let state = start_combat("Troll", 10, 8, 7, 2, 5);
        let mut dice = ScriptedDice::new([1, 1, 6, 6]);
        let (round, next) = execute_round_with(&state, false, &mut dice).unwrap();

        assert!(round.combat_ended);
        assert_eq!(round.combat_winner, Some(Winner::Monster));
        assert_eq!(round.player_stamina_after, 0);
        assert!(!next.is_active());
        assert_eq!(next.winner(), Some(Winner::Monster));
    }

    #[test]
    fn test_stamina_saturates_at_zero() {
        let state = start_combat("Troll", 10, 8, 7, 1, 5);
        // monster wins with failed luck: 3 damage against 1 stamina
        let mut dice = ScriptedDice::new([1, 1, 6, 6, 6, 6]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();

        assert_eq!(round.damage_to_player, 3);
        assert_eq!(round.player_stamina_after, 0);
        assert_eq!(next.player_stamina, 0);
    }

    #[test]
    fn test_simultaneous_knockout_is_draw() {
        // the player starts at zero stamina but still wins the round
        let state = start_combat("Wight", 6, 2, 10, 0, 0);
        let mut dice = ScriptedDice::new([6, 6, 1, 1]);
        let (round, next) = execute_round_with(&state, false, &mut dice).unwrap();

        assert_eq!(round.round_winner, Winner::Player);
        assert_eq!(round.monster_stamina_after, 0);
        assert_eq!(round.player_stamina_after, 0);
        assert!(round.combat_ended);
        assert_eq!(round.combat_winner, Some(Winner::Draw));
        assert_eq!(next.winner(), Some(Winner::Draw));
    }

    #[test]
    fn test_execute_round_on_ended_state_fails() {
        let state = start_combat("Rat", 3, 1, 10, 10, 5);
        let mut dice = ScriptedDice::new([6, 6, 1, 1]);
        let (_, ended) = execute_round_with(&state, false, &mut dice).unwrap();
        assert!(!ended.is_active());

        let err = execute_round_with(&ended, false, &mut dice).unwrap_err();
        assert!(matches!(
            err,
            CombatError::CombatEnded {
                winner: Winner::Player
            }
        ));
    }

    #[test]
    fn test_luck_exhausts_then_skips() {
        let state = start_combat("Orc", 6, 20, 8, 16, 1);
        // round 1: player wins, luck roll 2 <= 1 fails
        let mut dice = ScriptedDice::new([6, 6, 1, 1, 1, 1]);
        let (round, next) = execute_round_with(&state, true, &mut dice).unwrap();
        assert!(!round.luck_test.unwrap().success);
        assert_eq!(next.player_luck, 0);

        // round 2: the attempt is skipped outright
        let mut dice = ScriptedDice::new([6, 6, 1, 1]);
        let (round, next) = execute_round_with(&next, true, &mut dice).unwrap();
        assert_eq!(dice.remaining(), 0);
        assert!(round.luck_test.is_none());
        assert_eq!(next.player_luck, 0);
    }
}
