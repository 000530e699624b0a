//! Combatants
//!
//! A combatant is created empty, has its ability scores rolled, receives its
//! racial bonus once, and only then enters combat. Attack bonus and defense
//! are derived from the finalized scores and never change during a fight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::abilities::{Ability, AbilityScores};
use super::dice::{self, is_natural_twenty, DieSource};
use super::error::{CombatError, Result};
use super::race::RaceRegistry;

/// Armor class of a combatant without racial armor
pub const DEFAULT_ARMOR_CLASS: i32 = 10;

fn first_missing(scores: &AbilityScores) -> Option<Ability> {
    Ability::ALL.into_iter().find(|&a| scores.get(a).is_err())
}

/// Which side of the table a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantClass {
    Player,
    Enemy,
}

impl CombatantClass {
    /// Whether a natural 20 counts as a critical hit. Enemies never crit.
    pub fn scores_critical(self, natural: u32) -> bool {
        match self {
            CombatantClass::Player => is_natural_twenty(natural),
            CombatantClass::Enemy => false,
        }
    }
}

/// Result of an attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// The d20 face
    pub natural: u32,
    /// Face plus attack bonus
    pub value: i32,
    /// Whether it was a critical hit
    pub critical: bool,
}

/// A fighter with ability scores and derived combat stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    name: String,
    race: String,
    class: CombatantClass,
    level: u32,
    scores: AbilityScores,
    base_hp: i32,
    max_hp: i32,
    hp: i32,
    armor_class: i32,
    attack_bonus: i32,
    defense: i32,
    race_applied: bool,
}

impl Combatant {
    /// Create a combatant with no ability scores yet
    pub fn new(
        name: impl Into<String>,
        race: impl Into<String>,
        class: CombatantClass,
        base_hp: i32,
    ) -> Self {
        Self {
            name: name.into(),
            race: race.into(),
            class,
            level: 1,
            scores: AbilityScores::new(),
            base_hp,
            max_hp: 0,
            hp: 0,
            armor_class: DEFAULT_ARMOR_CLASS,
            attack_bonus: 0,
            defense: DEFAULT_ARMOR_CLASS,
            race_applied: false,
        }
    }

    /// Shorthand for a player character
    pub fn player(name: impl Into<String>, race: impl Into<String>, base_hp: i32) -> Self {
        Self::new(name, race, CombatantClass::Player, base_hp)
    }

    /// Shorthand for an enemy
    pub fn enemy(name: impl Into<String>, race: impl Into<String>, base_hp: i32) -> Self {
        Self::new(name, race, CombatantClass::Enemy, base_hp)
    }

    /// Roll 3d6 for each ability, in STR..CHA order, then derive stats
    pub fn roll_ability_scores(&mut self, dice: &mut dyn DieSource) -> Result<()> {
        let mut scores = AbilityScores::new();
        for ability in Ability::ALL {
            scores.set(ability, dice::roll(dice, 6, 3)?);
        }
        self.set_ability_scores(scores)
    }

    /// Install a complete set of scores, then derive stats
    pub fn set_ability_scores(&mut self, scores: AbilityScores) -> Result<()> {
        if let Some(missing) = first_missing(&scores) {
            return Err(CombatError::MissingStat(missing));
        }
        self.scores = scores;
        self.derive()?;
        debug!(
            name = %self.name,
            max_hp = self.max_hp,
            attack = self.attack_bonus,
            defense = self.defense,
            "ability scores set"
        );
        Ok(())
    }

    /// Apply this combatant's racial bonus. Allowed exactly once.
    pub fn apply_race_bonus(&mut self, registry: &RaceRegistry) -> Result<()> {
        if let Some(missing) = first_missing(&self.scores) {
            return Err(CombatError::MissingStat(missing));
        }
        if self.race_applied {
            return Err(CombatError::RaceAlreadyApplied(self.name.clone()));
        }

        match registry.get(&self.race) {
            Some(race) => {
                for (&ability, &delta) in &race.bonuses {
                    self.scores.add(ability, delta)?;
                }
                if let Some(ac) = race.armor_class {
                    self.armor_class = ac;
                }
            }
            None => debug!(name = %self.name, race = %self.race, "unknown race, no bonus"),
        }

        self.race_applied = true;
        self.derive()
    }

    fn derive(&mut self) -> Result<()> {
        self.max_hp = self.base_hp + self.scores.modifier(Ability::Con)?;
        self.hp = self.max_hp.max(0);
        self.attack_bonus = self.scores.modifier(Ability::Str)?;
        self.defense = self.armor_class;
        Ok(())
    }

    /// Roll a d20 attack
    pub fn roll_attack(&self, dice: &mut dyn DieSource) -> Result<AttackRoll> {
        let natural = dice::roll(dice, 20, 1)? as u32;
        Ok(AttackRoll {
            natural,
            value: natural as i32 + self.attack_bonus,
            critical: self.class.scores_critical(natural),
        })
    }

    /// Take damage, never dropping below 0 HP
    pub fn take_damage(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(amount).max(0);
    }

    /// Heal (cannot exceed max_hp)
    pub fn heal(&mut self, amount: u32) -> u32 {
        let missing = (self.max_hp - self.hp).max(0) as u32;
        let actual = amount.min(missing);
        self.hp += actual as i32;
        actual
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// True once every ability score is set
    pub fn is_ready(&self) -> bool {
        self.scores.is_complete()
    }

    pub fn modifier(&self, ability: Ability) -> Result<i32> {
        self.scores.modifier(ability)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn class(&self) -> CombatantClass {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn scores(&self) -> &AbilityScores {
        &self.scores
    }

    pub fn base_hp(&self) -> i32 {
        self.base_hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }
}
