//! Combat errors

use thiserror::Error;

use super::abilities::Ability;

/// Contract violations raised by the combat core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ability score {0} has not been rolled")]
    MissingStat(Ability),

    #[error("racial bonus already applied to {0}")]
    RaceAlreadyApplied(String),

    #[error("combatant {0} has no ability scores")]
    NotReady(String),
}

pub type Result<T> = std::result::Result<T, CombatError>;
