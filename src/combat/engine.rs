//! Combat engine
//!
//! Runs a duel between two combatants. They trade single attacks until one
//! drops to 0 HP or the round cap is reached. Every attack is recorded in a
//! log, and the round cap, when hit, is always the final entry.
//!
//! Damage is the margin of the attack roll over the defender's defense.
//! Critical hits are recorded but do not add damage.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::abilities::Ability;
use super::combatant::Combatant;
use super::dice::{self, DieSource};
use super::error::{CombatError, Result};

/// Round cap used when the caller has no preference
pub const DEFAULT_MAX_ROUNDS: u32 = 300;

/// One attack, as resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attacker: String,
    pub defender: String,
    /// Attack roll including the attacker's bonus
    pub roll: i32,
    pub critical: bool,
    pub damage: u32,
    pub defender_hp: i32,
}

/// A combat log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatLogEntry {
    Attack(AttackRecord),
    /// The fight was stopped by the round cap
    RoundCap { rounds: u32 },
}

impl CombatLogEntry {
    pub fn as_attack(&self) -> Option<&AttackRecord> {
        match self {
            CombatLogEntry::Attack(record) => Some(record),
            CombatLogEntry::RoundCap { .. } => None,
        }
    }
}

/// First or second combatant of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// How a fight was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// A combatant dropped to 0 HP
    Death,
    /// The round cap was reached; higher HP wins, first combatant on ties
    RoundCap,
}

/// Session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Resolved(Side),
}

/// Result of a finished fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Winner's display name
    pub winner: String,
    pub winner_side: Side,
    pub ending: Ending,
    /// Attacks resolved
    pub rounds: u32,
    pub log: Vec<CombatLogEntry>,
}

/// A single fight between two borrowed combatants
///
/// The session only mutates HP; combatants outlive it.
pub struct CombatSession<'a> {
    fighters: [&'a mut Combatant; 2],
    round: u32,
    max_rounds: u32,
    log: Vec<CombatLogEntry>,
    state: SessionState,
}

impl<'a> CombatSession<'a> {
    /// Set up a fight. `first` attacks first.
    pub fn new(
        first: &'a mut Combatant,
        second: &'a mut Combatant,
        max_rounds: u32,
    ) -> Result<Self> {
        if max_rounds == 0 {
            return Err(CombatError::InvalidArgument(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        for fighter in [&*first, &*second] {
            if !fighter.is_ready() {
                return Err(CombatError::NotReady(fighter.name().to_string()));
            }
        }

        Ok(Self {
            fighters: [first, second],
            round: 0,
            max_rounds,
            log: Vec::new(),
            state: SessionState::NotStarted,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn log(&self) -> &[CombatLogEntry] {
        &self.log
    }

    fn fighter(&self, side: Side) -> &Combatant {
        &*self.fighters[side.index()]
    }

    fn both_alive(&self) -> bool {
        self.fighters.iter().all(|f| f.is_alive())
    }

    /// Resolve one attack and record it. Returns true if the defender died.
    fn turn(&mut self, attacker: Side, dice: &mut dyn DieSource) -> Result<bool> {
        let defender = attacker.other();
        self.round += 1;

        let attack = self.fighter(attacker).roll_attack(dice)?;
        let damage = (attack.value - self.fighter(defender).defense()).max(0) as u32;

        self.fighters[defender.index()].take_damage(damage);

        let record = AttackRecord {
            attacker: self.fighter(attacker).name().to_string(),
            defender: self.fighter(defender).name().to_string(),
            roll: attack.value,
            critical: attack.critical,
            damage,
            defender_hp: self.fighter(defender).hp(),
        };
        debug!(
            round = self.round,
            attacker = %record.attacker,
            defender = %record.defender,
            roll = record.roll,
            critical = record.critical,
            damage = record.damage,
            defender_hp = record.defender_hp,
            "attack resolved"
        );
        self.log.push(CombatLogEntry::Attack(record));

        Ok(!self.fighter(defender).is_alive())
    }

    /// Fight to the end. A session can only be run once.
    pub fn run(&mut self, dice: &mut dyn DieSource) -> Result<CombatOutcome> {
        if self.state != SessionState::NotStarted {
            return Err(CombatError::InvalidArgument(
                "combat session already ran".to_string(),
            ));
        }
        self.state = SessionState::InProgress;
        let mut attacker = Side::First;

        while self.both_alive() && self.round < self.max_rounds {
            if self.turn(attacker, dice)? {
                break;
            }
            attacker = attacker.other();
        }

        let (winner_side, ending) = if self.both_alive() {
            self.log.push(CombatLogEntry::RoundCap { rounds: self.round });
            let first = self.fighter(Side::First).hp();
            let second = self.fighter(Side::Second).hp();
            let side = if first >= second { Side::First } else { Side::Second };
            (side, Ending::RoundCap)
        } else if self.fighter(Side::First).is_alive() {
            (Side::First, Ending::Death)
        } else {
            (Side::Second, Ending::Death)
        };

        self.state = SessionState::Resolved(winner_side);
        let winner = self.fighter(winner_side).name().to_string();
        info!(winner = %winner, ?ending, rounds = self.round, "combat resolved");

        Ok(CombatOutcome {
            winner,
            winner_side,
            ending,
            rounds: self.round,
            log: self.log.clone(),
        })
    }
}

/// Run a fight between `first` and `second`, `first` attacking first
pub fn run(
    first: &mut Combatant,
    second: &mut Combatant,
    max_rounds: u32,
    dice: &mut dyn DieSource,
) -> Result<CombatOutcome> {
    CombatSession::new(first, second, max_rounds)?.run(dice)
}

/// Roll 1d20 + DEX modifier for each side; the first side wins ties
pub fn roll_initiative(
    first: &Combatant,
    second: &Combatant,
    dice: &mut dyn DieSource,
) -> Result<Side> {
    let first_init = dice::roll(dice, 20, 1)? + first.modifier(Ability::Dex)?;
    let second_init = dice::roll(dice, 20, 1)? + second.modifier(Ability::Dex)?;
    debug!(
        first = %first.name(),
        first_init,
        second = %second.name(),
        second_init,
        "initiative rolled"
    );

    Ok(if first_init >= second_init {
        Side::First
    } else {
        Side::Second
    })
}
