//! Dice rolling system
//!
//! All randomness flows through a single [`DieSource`]. Seeding that source
//! once makes every stat roll and attack roll of a session reproducible.
//! Also parses dice notation like "3d6", "1d20+5", "d8-1".

use std::collections::VecDeque;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::error::{CombatError, Result};

/// A stream of single die faces
pub trait DieSource {
    /// Draw one face in `1..=sides`. `sides` is always at least 1.
    fn draw(&mut self, sides: u32) -> u32;
}

/// Seeded pseudo-random dice
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
    seed: u64,
}

impl SeededDice {
    /// Create dice from a fixed seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create dice from a fresh random seed
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// The seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DieSource for SeededDice {
    fn draw(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides)
    }
}

/// Replays a fixed sequence of faces, wrapping around when exhausted
///
/// Faces are returned as given, regardless of the requested sides.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    script: Vec<u32>,
    draws: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        let script = faces.into();
        Self {
            faces: script.iter().copied().collect(),
            script,
            draws: 0,
        }
    }

    /// Number of faces drawn so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl DieSource for ScriptedDice {
    fn draw(&mut self, _sides: u32) -> u32 {
        if self.faces.is_empty() {
            self.faces.extend(self.script.iter().copied());
        }
        self.draws += 1;
        self.faces.pop_front().unwrap_or(1)
    }
}

fn check_die(sides: u32, count: u32) -> Result<()> {
    if sides < 1 {
        return Err(CombatError::InvalidArgument(format!(
            "die must have at least 1 side (got {})",
            sides
        )));
    }
    if count < 1 {
        return Err(CombatError::InvalidArgument(format!(
            "must roll at least 1 die (got {})",
            count
        )));
    }
    Ok(())
}

/// Roll `count` dice with `sides` faces each and return the sum
pub fn roll(dice: &mut dyn DieSource, sides: u32, count: u32) -> Result<i32> {
    check_die(sides, count)?;

    let mut total: u64 = 0;
    for _ in 0..count {
        let face = dice.draw(sides);
        total = total
            .checked_add(u64::from(face))
            .ok_or_else(|| too_large(sides, count))?;
    }
    trace!(sides, count, total, "rolled dice");

    i32::try_from(total).map_err(|_| too_large(sides, count))
}

fn too_large(sides: u32, count: u32) -> CombatError {
    CombatError::InvalidArgument(format!("{}d{} total does not fit in an i32", count, sides))
}

/// Roll one die twice and keep the higher face
pub fn roll_with_advantage(dice: &mut dyn DieSource, sides: u32) -> Result<i32> {
    let first = roll(dice, sides, 1)?;
    let second = roll(dice, sides, 1)?;
    Ok(first.max(second))
}

/// Roll one die twice and keep the lower face
pub fn roll_with_disadvantage(dice: &mut dyn DieSource, sides: u32) -> Result<i32> {
    let first = roll(dice, sides, 1)?;
    let second = roll(dice, sides, 1)?;
    Ok(first.min(second))
}

/// Check if a d20 face is a natural 20
pub fn is_natural_twenty(face: u32) -> bool {
    face == 20
}

/// A parsed dice roll specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    /// Roll the dice and return the total including the modifier
    pub fn roll(&self, dice: &mut dyn DieSource) -> Result<i32> {
        roll(dice, self.sides, self.count)?
            .checked_add(self.modifier)
            .ok_or_else(|| bad_notation(format!("{} total does not fit in an i32", self)))
    }

    /// Get the minimum possible result, saturating at the i32 bounds
    pub fn min(&self) -> i32 {
        clamp_i32(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Get the maximum possible result, saturating at the i32 bounds
    pub fn max(&self) -> i32 {
        clamp_i32(i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier))
    }

    /// Get the expected average (rounded down)
    pub fn average(&self) -> i32 {
        let avg_per_die = (1.0 + self.sides as f64) / 2.0;
        (self.count as f64 * avg_per_die + self.modifier as f64) as i32
    }
}

impl FromStr for DiceRoll {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m if m < 0 => write!(f, "{}d{}{}", self.count, self.sides, m),
            _ => write!(f, "{}d{}", self.count, self.sides),
        }
    }
}

fn bad_notation(msg: String) -> CombatError {
    CombatError::InvalidArgument(msg)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll> {
    let notation = notation.trim().to_lowercase();

    let d_pos = notation
        .find('d')
        .ok_or_else(|| bad_notation(format!("missing 'd' in dice notation: {}", notation)))?;

    let count_str = &notation[..d_pos];
    let count: u32 = if count_str.is_empty() {
        1
    } else {
        count_str
            .parse()
            .map_err(|_| bad_notation(format!("invalid dice count: {}", count_str)))?
    };

    let rest = &notation[d_pos + 1..];
    let (sides_str, modifier) = match rest.find(['+', '-']) {
        Some(pos) => {
            let mod_str = rest[pos..].trim_start_matches('+');
            let modifier: i32 = mod_str
                .parse()
                .map_err(|_| bad_notation(format!("invalid modifier: {}", mod_str)))?;
            (&rest[..pos], modifier)
        }
        None => (rest, 0),
    };

    let sides: u32 = sides_str
        .parse()
        .map_err(|_| bad_notation(format!("invalid die sides: {}", sides_str)))?;

    check_die(sides, count)?;

    // The largest total, modifier included, must fit in an i32
    let highest = i64::from(count) * i64::from(sides) + i64::from(modifier);
    if highest > i64::from(i32::MAX) {
        return Err(bad_notation(format!("dice total out of range: {}", notation)));
    }

    Ok(DiceRoll { count, sides, modifier })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_sums_faces() {
        let mut dice = ScriptedDice::new([4]);
        assert_eq!(roll(&mut dice, 6, 1).unwrap(), 4);

        let mut dice = ScriptedDice::new([3]);
        assert_eq!(roll(&mut dice, 20, 2).unwrap(), 6);

        let mut dice = ScriptedDice::new([1, 2]);
        assert_eq!(roll(&mut dice, 6, 1).unwrap(), 1);
        assert_eq!(roll(&mut dice, 20, 1).unwrap(), 2);
    }

    #[test]
    fn test_roll_rejects_bad_arguments() {
        let mut dice = ScriptedDice::new([1]);
        assert!(matches!(
            roll(&mut dice, 0, 1),
            Err(CombatError::InvalidArgument(_))
        ));
        assert!(matches!(
            roll(&mut dice, 6, 0),
            Err(CombatError::InvalidArgument(_))
        ));
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn test_roll_rejects_totals_beyond_i32() {
        let mut dice = ScriptedDice::new([3_000_000_000]);
        assert!(matches!(
            roll(&mut dice, 3_000_000_000, 1),
            Err(CombatError::InvalidArgument(_))
        ));

        let mut dice = ScriptedDice::new([u32::MAX, 1]);
        assert!(matches!(
            roll(&mut dice, u32::MAX, 2),
            Err(CombatError::InvalidArgument(_))
        ));

        let top = i32::MAX as u32;
        let mut dice = ScriptedDice::new([top]);
        assert_eq!(roll(&mut dice, top, 1).unwrap(), i32::MAX);

        let mut dice = ScriptedDice::new([top, 1]);
        assert!(roll(&mut dice, top, 2).is_err());
    }

    #[test]
    fn test_advantage_and_disadvantage() {
        let mut dice = ScriptedDice::new([3, 5]);
        assert_eq!(roll_with_advantage(&mut dice, 20).unwrap(), 5);

        let mut dice = ScriptedDice::new([6, 2]);
        assert_eq!(roll_with_advantage(&mut dice, 6).unwrap(), 6);

        let mut dice = ScriptedDice::new([3, 5]);
        assert_eq!(roll_with_disadvantage(&mut dice, 20).unwrap(), 3);

        let mut dice = ScriptedDice::new([6, 2]);
        assert_eq!(roll_with_disadvantage(&mut dice, 6).unwrap(), 2);
    }

    #[test]
    fn test_advantage_always_draws_twice() {
        let mut dice = ScriptedDice::new([20, 1, 7]);
        roll_with_advantage(&mut dice, 20).unwrap();
        assert_eq!(dice.draws(), 2);
        roll_with_disadvantage(&mut dice, 20).unwrap();
        assert_eq!(dice.draws(), 4);
    }

    #[test]
    fn test_scripted_dice_wraps() {
        let mut dice = ScriptedDice::new([2, 4]);
        let faces: Vec<u32> = (0..5).map(|_| dice.draw(6)).collect();
        assert_eq!(faces, vec![2, 4, 2, 4, 2]);
    }

    #[test]
    fn test_seeded_bounds_and_replay() {
        let mut a = SeededDice::from_seed(42);
        let mut b = SeededDice::from_seed(42);

        for _ in 0..100 {
            let x = roll(&mut a, 6, 3).unwrap();
            assert!((3..=18).contains(&x), "3d6 rolled {}", x);
            assert_eq!(x, roll(&mut b, 6, 3).unwrap());
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_parse_basic() {
        let roll = parse_dice("2d6").unwrap();
        assert_eq!(roll, DiceRoll::new(2, 6, 0));
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(parse_dice("1d20+5").unwrap(), DiceRoll::new(1, 20, 5));
        assert_eq!(parse_dice("3d8-2").unwrap(), DiceRoll::new(3, 8, -2));
        assert_eq!(parse_dice("d6").unwrap(), DiceRoll::new(1, 6, 0));
        assert_eq!(parse_dice("  2D10+3  ").unwrap(), DiceRoll::new(2, 10, 3));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in [
            "abc",
            "2d",
            "d",
            "0d6",
            "2d0",
            "2d6+",
            "xd6",
            "70000d70000",
            "1d2147483647+1",
        ] {
            assert!(parse_dice(bad).is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_parse_accepts_largest_total() {
        let roll = parse_dice("1d2147483647").unwrap();
        assert_eq!(roll.max(), i32::MAX);

        let roll = parse_dice("2d1073741823+1").unwrap();
        assert_eq!(roll.max(), i32::MAX);
        assert_eq!(roll.min(), 3);
    }

    #[test]
    fn test_notation_stats_saturate() {
        let spec = DiceRoll::new(70_000, 70_000, 0);
        assert_eq!(spec.max(), i32::MAX);
        assert_eq!(DiceRoll::new(1, 6, i32::MIN).min(), i32::MIN + 1);

        let spec = DiceRoll::new(1, 6, i32::MAX);
        let mut dice = ScriptedDice::new([6]);
        assert!(matches!(
            spec.roll(&mut dice),
            Err(CombatError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_notation_roll_and_stats() {
        let spec = DiceRoll::new(2, 6, 3);
        assert_eq!(spec.min(), 5);
        assert_eq!(spec.max(), 15);
        assert_eq!(spec.average(), 10);

        let mut dice = ScriptedDice::new([4, 5]);
        assert_eq!(spec.roll(&mut dice).unwrap(), 12);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(2, 6, 0).to_string(), "2d6");
        assert_eq!(DiceRoll::new(1, 20, 5).to_string(), "1d20+5");
        assert_eq!(DiceRoll::new(3, 8, -2).to_string(), "3d8-2");
    }

    #[test]
    fn test_natural_twenty() {
        assert!(is_natural_twenty(20));
        assert!(!is_natural_twenty(19));
    }
}
