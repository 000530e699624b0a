//! Adventure progression
//!
//! An adventure is a fixed list of encounters. Each can be completed once,
//! and completing it awards experience by difficulty.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::combat::Combatant;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdventureError {
    #[error("encounter '{0}' not found")]
    UnknownEncounter(String),

    #[error("encounter '{0}' already completed")]
    AlreadyCompleted(String),
}

/// Encounter difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Experience awarded for completing an encounter
    pub fn experience(&self) -> u32 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Medium => 250,
            Difficulty::Hard => 500,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

/// The enemy waiting in an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foe {
    pub name: String,
    pub race: String,
    pub base_hp: i32,
}

impl Foe {
    /// A fresh, unrolled enemy combatant for this foe
    pub fn spawn(&self) -> Combatant {
        Combatant::enemy(&self.name, &self.race, self.base_hp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub key: String,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub foe: Foe,
}

impl Encounter {
    fn new(
        key: &str,
        name: &str,
        description: &str,
        difficulty: Difficulty,
        foe: (&str, &str, i32),
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            difficulty,
            foe: Foe {
                name: foe.0.to_string(),
                race: foe.1.to_string(),
                base_hp: foe.2,
            },
        }
    }
}

/// Snapshot of adventure progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureStatus {
    pub name: String,
    pub current_scene: String,
    pub completed_encounters: Vec<String>,
    pub available_encounters: Vec<String>,
    pub experience: u32,
}

#[derive(Debug, Clone)]
pub struct Adventure {
    name: String,
    description: String,
    current_scene: String,
    encounters: Vec<Encounter>,
    completed: BTreeSet<String>,
    experience: u32,
}

impl Adventure {
    /// Create an adventure with the standard three encounters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let encounters = vec![
            Encounter::new(
                "goblin_ambush",
                "Goblin Ambush",
                "A group of goblins blocks your path",
                Difficulty::Easy,
                ("Goblin", "Goblin", 7),
            ),
            Encounter::new(
                "treasure_room",
                "Treasure Room",
                "A room filled with treasure and traps",
                Difficulty::Medium,
                ("Skeleton Guardian", "Skeleton", 10),
            ),
            Encounter::new(
                "dragon_lair",
                "Dragon's Lair",
                "The final confrontation with an ancient dragon",
                Difficulty::Hard,
                ("Ancient Dragon", "Dragon", 20),
            ),
        ];

        Self {
            name: name.into(),
            description: description.into(),
            current_scene: "Starting Area".to_string(),
            encounters,
            completed: BTreeSet::new(),
            experience: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn encounter(&self, key: &str) -> Result<&Encounter, AdventureError> {
        self.encounters
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| AdventureError::UnknownEncounter(key.to_string()))
    }

    pub fn is_completed(&self, key: &str) -> bool {
        self.completed.contains(key)
    }

    /// Keys of encounters not yet completed, in adventure order
    pub fn available(&self) -> Vec<&str> {
        self.encounters
            .iter()
            .filter(|e| !self.completed.contains(&e.key))
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Enter an encounter
    pub fn begin(&mut self, key: &str) -> Result<&Encounter, AdventureError> {
        if self.is_completed(key) {
            return Err(AdventureError::AlreadyCompleted(key.to_string()));
        }
        let name = self.encounter(key)?.name.clone();
        info!(encounter = key, "starting encounter");
        self.current_scene = name;
        self.encounter(key)
    }

    /// Mark an encounter completed and return the experience gained
    pub fn complete(&mut self, key: &str) -> Result<u32, AdventureError> {
        let gained = self.encounter(key)?.difficulty.experience();
        if !self.completed.insert(key.to_string()) {
            return Err(AdventureError::AlreadyCompleted(key.to_string()));
        }
        self.experience += gained;
        info!(encounter = key, gained, total = self.experience, "encounter completed");
        Ok(gained)
    }

    pub fn status(&self) -> AdventureStatus {
        AdventureStatus {
            name: self.name.clone(),
            current_scene: self.current_scene.clone(),
            completed_encounters: self
                .encounters
                .iter()
                .filter(|e| self.completed.contains(&e.key))
                .map(|e| e.key.clone())
                .collect(),
            available_encounters: self.available().into_iter().map(String::from).collect(),
            experience: self.experience,
        }
    }
}
