//! Game configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `DNDGAME_`-prefixed environment variables. Command-line flags are applied
//! on top by the binary.

use std::collections::BTreeMap;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{RaceRegistry, DEFAULT_MAX_ROUNDS};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DNDGAME_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A custom race declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Stat name to delta; unknown stat names are ignored
    pub bonuses: BTreeMap<String, i32>,
    pub armor_class: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the shared dice stream; random when absent
    pub seed: Option<u64>,
    pub max_rounds: u32,
    pub player_base_hp: i32,
    pub enemy_base_hp: i32,
    /// Extra races, added to (or replacing) the built-in ones
    pub races: BTreeMap<String, RaceConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            player_base_hp: 10,
            enemy_base_hp: 7,
            races: BTreeMap::new(),
        }
    }
}

impl GameConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(GameConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load configuration from a TOML string over the defaults
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::from(Serialized::defaults(GameConfig::default())).merge(Toml::string(toml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: GameConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        for (key, hp) in [
            ("player_base_hp", self.player_base_hp),
            ("enemy_base_hp", self.enemy_base_hp),
        ] {
            if hp < 1 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at least 1 (got {})",
                    key, hp
                )));
            }
        }
        Ok(())
    }

    /// Built-in races plus those declared in configuration
    pub fn race_registry(&self) -> RaceRegistry {
        let mut registry = RaceRegistry::new();
        for (name, race) in &self.races {
            registry.register_named(name, &race.bonuses, race.armor_class);
        }
        registry
    }
}
