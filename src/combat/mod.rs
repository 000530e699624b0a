//! Combat system module
//!
//! Implements D&D-style duels with:
//! - Seedable dice (e.g., "3d6", "1d20+5")
//! - Ability scores and modifiers
//! - Race bonuses and armor class overrides
//! - Combatants with derived HP, attack bonus and defense
//! - Turn-by-turn combat resolution with an event log

mod abilities;
mod combatant;
mod dice;
mod engine;
mod error;
mod race;

pub use abilities::{modifier, Ability, AbilityScores};
pub use combatant::{AttackRoll, Combatant, CombatantClass, DEFAULT_ARMOR_CLASS};
pub use dice::{
    parse_dice, roll, roll_with_advantage, roll_with_disadvantage, DiceRoll, DieSource,
    ScriptedDice, SeededDice,
};
pub use engine::{
    roll_initiative, run, AttackRecord, CombatLogEntry, CombatOutcome, CombatSession, Ending,
    SessionState, Side, DEFAULT_MAX_ROUNDS,
};
pub use error::{CombatError, Result};
pub use race::{Race, RaceRegistry};
