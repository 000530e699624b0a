//! dndgame - turn-based tabletop combat
//!
//! Two combatants with rolled ability scores trade attacks until one falls
//! or the round cap is reached. Every roll comes from one seedable dice
//! stream, so a seed replays a whole session.

pub mod adventure;
pub mod combat;
pub mod config;

pub use config::GameConfig;
