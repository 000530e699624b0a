//! Common test utilities - combatant builders

#![allow(dead_code)]

use dndgame::combat::{
    AbilityScores, CombatLogEntry, Combatant, CombatantClass, Race, RaceRegistry, SeededDice,
};

/// A combatant with fixed scores (STR, DEX, CON, INT, WIS, CHA) and no racial bonus
pub fn fixed(name: &str, class: CombatantClass, base_hp: i32, scores: [i32; 6]) -> Combatant {
    let mut combatant = Combatant::new(name, "none", class, base_hp);
    combatant
        .set_ability_scores(AbilityScores::from_array(scores))
        .expect("complete scores");
    combatant
}

/// Roll a combatant from the dice and apply its racial bonus
pub fn rolled(
    name: &str,
    race: &str,
    class: CombatantClass,
    base_hp: i32,
    registry: &RaceRegistry,
    dice: &mut SeededDice,
) -> Combatant {
    let mut combatant = Combatant::new(name, race, class, base_hp);
    combatant.roll_ability_scores(dice).expect("roll stats");
    combatant.apply_race_bonus(registry).expect("race bonus");
    combatant
}

/// A registry with a race nobody can damage
pub fn registry_with_golem() -> RaceRegistry {
    let mut registry = RaceRegistry::new();
    registry.register(Race::new("Golem").with_armor_class(40));
    registry
}

/// Attack records of a log, skipping the round cap
pub fn attacks(log: &[CombatLogEntry]) -> Vec<&dndgame::combat::AttackRecord> {
    log.iter().filter_map(CombatLogEntry::as_attack).collect()
}
