//! Configuration loading tests

mod common;

use std::io::Write;
use std::path::Path;

use dndgame::combat::{self, Ability, CombatantClass, SeededDice};
use dndgame::config::ConfigError;
use dndgame::GameConfig;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    writeln!(
        file,
        r#"
seed = 7
max_rounds = 12
enemy_base_hp = 9

[races.Troll]
armor_class = 14

[races.Troll.bonuses]
STR = 3
CON = 1
"#
    )
    .unwrap();

    let config = GameConfig::load(Some(file.path())).expect("Failed to load config");
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.max_rounds, 12);
    assert_eq!(config.enemy_base_hp, 9);
    assert_eq!(config.player_base_hp, 10);

    let registry = config.race_registry();
    let troll = registry.get("troll").expect("troll registered");
    assert_eq!(troll.bonuses.get(&Ability::Str), Some(&3));
    assert_eq!(troll.armor_class, Some(14));

    // Configured races feed straight into character creation
    let mut dice = SeededDice::from_seed(config.seed.unwrap());
    let troll = common::rolled(
        "Grok",
        "Troll",
        CombatantClass::Enemy,
        config.enemy_base_hp,
        &registry,
        &mut dice,
    );
    assert_eq!(troll.defense(), 14);
}

#[test]
fn test_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("game.toml", "max_rounds = 12\nenemy_base_hp = 9")?;
        jail.set_env("DNDGAME_MAX_ROUNDS", "7");

        let config = GameConfig::load(Some(Path::new("game.toml"))).map_err(|e| e.to_string())?;
        assert_eq!(config.max_rounds, 7);
        assert_eq!(config.enemy_base_hp, 9);

        // The env layer is validated like the file
        jail.set_env("DNDGAME_PLAYER_BASE_HP", "0");
        let err = GameConfig::load(Some(Path::new("game.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    });
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_bad_value_is_an_error() {
    let err = GameConfig::from_toml("max_rounds = \"lots\"").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_configured_seed_replays_fight() {
    let config = GameConfig::from_toml("seed = 99\nmax_rounds = 20").unwrap();
    let registry = config.race_registry();

    let fight = || {
        let mut dice = SeededDice::from_seed(config.seed.unwrap());
        let mut hero =
            common::rolled("Hero", "Dwarf", CombatantClass::Player, 10, &registry, &mut dice);
        let mut goblin =
            common::rolled("Goblin", "Goblin", CombatantClass::Enemy, 7, &registry, &mut dice);
        combat::run(&mut hero, &mut goblin, config.max_rounds, &mut dice).unwrap()
    };

    assert_eq!(fight(), fight());
}
