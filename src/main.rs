//! dndgame - turn-based tabletop combat from the command line

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dndgame::adventure::Adventure;
use dndgame::combat::{
    self, parse_dice, Ability, CombatLogEntry, CombatOutcome, Combatant, RaceRegistry,
    SeededDice, Side,
};
use dndgame::GameConfig;

/// Turn-based tabletop combat simulator
#[derive(Parser, Debug)]
#[command(name = "dndgame", version, about = "Roll up a character and fight")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the dice; the same seed replays the same session
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Maximum number of attacks before a fight is decided on HP
    #[arg(long, global = true)]
    max_rounds: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fight a single enemy
    Fight {
        #[arg(long, default_value = "Hero")]
        name: String,
        #[arg(long, default_value = "Human")]
        race: String,
        /// Enemy race
        #[arg(long, default_value = "Goblin")]
        enemy: String,
        /// Enemy display name (defaults to the race)
        #[arg(long)]
        enemy_name: Option<String>,
        /// Enemy base HP (defaults to the configured value)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
        enemy_hp: Option<i32>,
        /// Roll initiative instead of letting the hero strike first
        #[arg(long)]
        initiative: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play through every encounter of the adventure
    Adventure {
        #[arg(long, default_value = "Hero")]
        name: String,
        #[arg(long, default_value = "Human")]
        race: String,
        #[arg(long)]
        json: bool,
    },
    /// Roll dice notation such as 3d6 or 1d20+5
    Roll { notation: String },
    /// List known races
    Races,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dndgame=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = GameConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    config.validate()?;

    // Seed before anything is rolled
    let mut dice = match config.seed {
        Some(seed) => SeededDice::from_seed(seed),
        None => SeededDice::from_entropy(),
    };
    info!(seed = dice.seed(), "dice seeded");

    let registry = config.race_registry();

    match args.command {
        Command::Fight {
            name,
            race,
            enemy,
            enemy_name,
            enemy_hp,
            initiative,
            json,
        } => {
            let mut hero = create(
                Combatant::player(name, race, config.player_base_hp),
                &registry,
                &mut dice,
            )?;
            let mut foe = create(
                Combatant::enemy(
                    enemy_name.unwrap_or_else(|| enemy.clone()),
                    enemy,
                    enemy_hp.unwrap_or(config.enemy_base_hp),
                ),
                &registry,
                &mut dice,
            )?;

            if !json {
                print_sheet(&hero);
                print_sheet(&foe);
            }

            let hero_first =
                !initiative || combat::roll_initiative(&hero, &foe, &mut dice)? == Side::First;
            let outcome = if hero_first {
                combat::run(&mut hero, &mut foe, config.max_rounds, &mut dice)?
            } else {
                combat::run(&mut foe, &mut hero, config.max_rounds, &mut dice)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
        }
        Command::Adventure { name, race, json } => {
            play_adventure(name, race, &config, &registry, &mut dice, json)?;
        }
        Command::Roll { notation } => {
            let spec = parse_dice(&notation)?;
            let total = spec.roll(&mut dice)?;
            println!("{} -> {} (range {}..={})", spec, total, spec.min(), spec.max());
        }
        Command::Races => {
            for name in registry.list() {
                let Some(race) = registry.get(name) else {
                    continue;
                };
                let bonuses: Vec<String> = race
                    .bonuses
                    .iter()
                    .map(|(ability, delta)| format!("{} {:+}", ability, delta))
                    .collect();
                match race.armor_class {
                    Some(ac) => println!("{:<10} {} (AC {})", race.name, bonuses.join(", "), ac),
                    None => println!("{:<10} {}", race.name, bonuses.join(", ")),
                }
            }
        }
    }

    Ok(())
}

/// Roll stats, then apply the racial bonus
fn create(
    mut combatant: Combatant,
    registry: &RaceRegistry,
    dice: &mut SeededDice,
) -> Result<Combatant> {
    combatant
        .roll_ability_scores(dice)
        .with_context(|| format!("rolling stats for {}", combatant.name()))?;
    if registry.get(combatant.race()).is_none() {
        warn!(race = %combatant.race(), "unknown race, no bonuses applied");
    }
    combatant.apply_race_bonus(registry)?;
    Ok(combatant)
}

fn play_adventure(
    name: String,
    race: String,
    config: &GameConfig,
    registry: &RaceRegistry,
    dice: &mut SeededDice,
    json: bool,
) -> Result<()> {
    let mut adventure = Adventure::new("The Long Road", "A small quest with a big ending.");
    let mut hero = create(
        Combatant::player(name, race, config.player_base_hp),
        registry,
        dice,
    )?;

    if !json {
        println!("Beginning adventure: {}", adventure.name());
        println!("{}\n", adventure.description());
        print_sheet(&hero);
    }

    let keys: Vec<String> = adventure.available().into_iter().map(String::from).collect();
    for key in keys {
        let encounter = adventure.begin(&key)?.clone();
        let mut foe = create(encounter.foe.spawn(), registry, dice)?;

        if !json {
            println!(
                "== {} ({}) ==\n{}",
                encounter.name, encounter.difficulty, encounter.description
            );
            print_sheet(&foe);
        }

        let outcome = combat::run(&mut hero, &mut foe, config.max_rounds, dice)?;
        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            print_outcome(&outcome);
        }

        if outcome.winner_side != Side::First {
            if !json {
                println!("{} has fallen. The adventure ends here.", hero.name());
            }
            break;
        }

        let gained = adventure.complete(&key)?;
        let healed = hero.heal(u32::MAX);
        if !json {
            println!("Experience gained: {} (healed {} HP)\n", gained, healed);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&adventure.status())?);
    } else {
        let status = adventure.status();
        println!(
            "Completed {} of 3 encounters, {} experience",
            status.completed_encounters.len(),
            status.experience
        );
    }
    Ok(())
}

fn print_sheet(combatant: &Combatant) {
    println!("{} the {}", combatant.name(), combatant.race());
    for ability in Ability::ALL {
        if let (Ok(score), Ok(modifier)) = (
            combatant.scores().get(ability),
            combatant.modifier(ability),
        ) {
            println!("  {}: {:>2} ({:+})", ability, score, modifier);
        }
    }
    println!(
        "  HP {}/{}  attack {:+}  defense {}\n",
        combatant.hp(),
        combatant.max_hp(),
        combatant.attack_bonus(),
        combatant.defense()
    );
}

fn print_outcome(outcome: &CombatOutcome) {
    for entry in &outcome.log {
        match entry {
            CombatLogEntry::Attack(record) => {
                let crit = if record.critical { " Critical hit!" } else { "" };
                if record.damage > 0 {
                    println!(
                        "{} attacks {} (roll {}) for {} damage, {} HP left.{}",
                        record.attacker,
                        record.defender,
                        record.roll,
                        record.damage,
                        record.defender_hp,
                        crit
                    );
                } else {
                    println!(
                        "{} attacks {} (roll {}) and misses.{}",
                        record.attacker, record.defender, record.roll, crit
                    );
                }
            }
            CombatLogEntry::RoundCap { rounds } => {
                println!("The fight is called after {} rounds.", rounds);
            }
        }
    }
    println!("{} wins!\n", outcome.winner);
}
