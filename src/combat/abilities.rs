//! Ability scores and modifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{CombatError, Result};

/// The six abilities, in rolling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// All abilities in the order they are rolled
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Str => "STR",
            Ability::Dex => "DEX",
            Ability::Con => "CON",
            Ability::Int => "INT",
            Ability::Wis => "WIS",
            Ability::Cha => "CHA",
        }
    }
}

impl FromStr for Ability {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STR" => Ok(Ability::Str),
            "DEX" => Ok(Ability::Dex),
            "CON" => Ok(Ability::Con),
            "INT" => Ok(Ability::Int),
            "WIS" => Ok(Ability::Wis),
            "CHA" => Ok(Ability::Cha),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier for a raw score: floor((score - 10) / 2)
pub fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Score per ability; a slot stays empty until it is rolled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    scores: [Option<i32>; 6],
}

impl AbilityScores {
    /// Empty scores, nothing rolled yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores from values in STR, DEX, CON, INT, WIS, CHA order
    pub fn from_array(values: [i32; 6]) -> Self {
        Self {
            scores: values.map(Some),
        }
    }

    pub fn get(&self, ability: Ability) -> Result<i32> {
        self.scores[ability.index()].ok_or(CombatError::MissingStat(ability))
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        self.scores[ability.index()] = Some(value);
    }

    /// Add `delta` to a rolled score
    pub fn add(&mut self, ability: Ability, delta: i32) -> Result<()> {
        let current = self.get(ability)?;
        self.set(ability, current + delta);
        Ok(())
    }

    pub fn modifier(&self, ability: Ability) -> Result<i32> {
        self.get(ability).map(modifier)
    }

    /// True once every ability has a score
    pub fn is_complete(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }

    /// Rolled scores in ability order
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL
            .into_iter()
            .filter_map(move |a| self.scores[a.index()].map(|v| (a, v)))
    }
}
