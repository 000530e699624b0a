//! Race registry
//!
//! Races grant additive ability bonuses and, for some monsters, a fixed
//! armor class. Lookups ignore case; an unknown race simply grants nothing.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::abilities::Ability;

/// Bonuses granted by a race
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    /// Display name
    pub name: String,
    /// Additive ability deltas
    pub bonuses: BTreeMap<Ability, i32>,
    /// Armor class override
    pub armor_class: Option<i32>,
}

impl Race {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_bonus(mut self, ability: Ability, delta: i32) -> Self {
        self.bonuses.insert(ability, delta);
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = Some(armor_class);
        self
    }

    /// Humans: +1 to every ability
    pub fn human() -> Self {
        Ability::ALL
            .iter()
            .fold(Self::new("Human"), |race, &a| race.with_bonus(a, 1))
    }

    pub fn elf() -> Self {
        Self::new("Elf").with_bonus(Ability::Dex, 2)
    }

    pub fn dwarf() -> Self {
        Self::new("Dwarf").with_bonus(Ability::Con, 2)
    }

    /// Goblins are nimble
    pub fn goblin() -> Self {
        Self::new("Goblin").with_bonus(Ability::Dex, 2).with_armor_class(15)
    }

    pub fn orc() -> Self {
        Self::new("Orc").with_bonus(Ability::Str, 2).with_armor_class(13)
    }

    pub fn skeleton() -> Self {
        Self::new("Skeleton").with_bonus(Ability::Con, 2).with_armor_class(13)
    }

    pub fn dragon() -> Self {
        Self::new("Dragon")
            .with_bonus(Ability::Str, 4)
            .with_bonus(Ability::Con, 4)
            .with_armor_class(17)
    }
}

/// Registry of known races, keyed case-insensitively
#[derive(Debug, Clone)]
pub struct RaceRegistry {
    races: HashMap<String, Race>,
}

impl RaceRegistry {
    /// Create a registry with the built-in races
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for race in [
            Race::human(),
            Race::elf(),
            Race::dwarf(),
            Race::goblin(),
            Race::orc(),
            Race::skeleton(),
            Race::dragon(),
        ] {
            registry.register(race);
        }
        registry
    }

    /// Create a registry with no races at all
    pub fn empty() -> Self {
        Self {
            races: HashMap::new(),
        }
    }

    /// Register a race, replacing any race with the same name
    pub fn register(&mut self, race: Race) {
        debug!(race = %race.name, "registering race");
        self.races.insert(race.name.to_lowercase(), race);
    }

    /// Register a race from loosely typed stat names. Unknown stats are
    /// dropped; keys naming the same stat in different case are summed.
    pub fn register_named(
        &mut self,
        name: &str,
        bonuses: &BTreeMap<String, i32>,
        armor_class: Option<i32>,
    ) {
        let mut race = Race::new(name);
        for (stat, delta) in bonuses {
            match stat.parse::<Ability>() {
                Ok(ability) => match race.bonuses.entry(ability) {
                    Entry::Occupied(mut total) => {
                        warn!(race = name, stat = %stat, %ability, "stat listed twice, summing bonuses");
                        *total.get_mut() += *delta;
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(*delta);
                    }
                },
                Err(()) => debug!(race = name, stat = %stat, "ignoring unknown stat"),
            }
        }
        race.armor_class = armor_class;
        self.register(race);
    }

    /// Look up a race by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&Race> {
        self.races.get(&name.to_lowercase())
    }

    /// Sorted display names of all races
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.races.values().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
