//! The closed set of boss combat actions
//!
//! Every behavior the boss can queue is a variant here. Parsing a token
//! outside this set fails, so nothing downstream ever sees an unknown action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::GameError;

/// A discrete combat behavior from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BossAction {
    /// One fast bullet straight down
    SingleShot,
    /// Three bullets fanned out
    SpreadShot,
    /// Three bullets stacked in a column
    VolleyShot,
    /// Twelve-point radial burst
    CircleShot,
    /// Charge-then-fire beam tracking the boss
    LaserSweep,
    /// Player-seeking missile
    HomingMissile,
    /// Area-denial mines
    LayMines,
    /// Reinforcement wave
    SummonMinions,
    /// Instant lateral jump
    Dodge,
    MoveLeft,
    MoveRight,
}

/// Broad grouping used by advisory validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Attack,
    Movement,
}

impl BossAction {
    pub const ALL: [BossAction; 11] = [
        BossAction::SingleShot,
        BossAction::SpreadShot,
        BossAction::VolleyShot,
        BossAction::CircleShot,
        BossAction::LaserSweep,
        BossAction::HomingMissile,
        BossAction::LayMines,
        BossAction::SummonMinions,
        BossAction::Dodge,
        BossAction::MoveLeft,
        BossAction::MoveRight,
    ];

    /// Actions the advisor may always propose. The beam joins once enraged.
    const BASE_ADVISORY: [BossAction; 9] = [
        BossAction::SingleShot,
        BossAction::SpreadShot,
        BossAction::VolleyShot,
        BossAction::CircleShot,
        BossAction::Dodge,
        BossAction::MoveLeft,
        BossAction::MoveRight,
        BossAction::HomingMissile,
        BossAction::LayMines,
    ];

    pub fn class(&self) -> ActionClass {
        match self {
            BossAction::Dodge | BossAction::MoveLeft | BossAction::MoveRight => {
                ActionClass::Movement
            }
            _ => ActionClass::Attack,
        }
    }

    pub fn is_attack(&self) -> bool {
        self.class() == ActionClass::Attack
    }

    /// Wire token, e.g. `SPREAD_SHOT`
    pub fn token(&self) -> &'static str {
        match self {
            BossAction::SingleShot => "SINGLE_SHOT",
            BossAction::SpreadShot => "SPREAD_SHOT",
            BossAction::VolleyShot => "VOLLEY_SHOT",
            BossAction::CircleShot => "CIRCLE_SHOT",
            BossAction::LaserSweep => "LASER_SWEEP",
            BossAction::HomingMissile => "HOMING_MISSILE",
            BossAction::LayMines => "LAY_MINES",
            BossAction::SummonMinions => "SUMMON_MINIONS",
            BossAction::Dodge => "DODGE",
            BossAction::MoveLeft => "MOVE_LEFT",
            BossAction::MoveRight => "MOVE_RIGHT",
        }
    }
}

/// The set of actions the advisor may propose in the current phase
pub fn legal_actions(enraged: bool) -> Vec<BossAction> {
    let mut legal = BossAction::BASE_ADVISORY.to_vec();
    if enraged {
        legal.push(BossAction::LaserSweep);
    }
    legal
}

impl fmt::Display for BossAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for BossAction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(|c: char| c == '-' || c == ' ', "_");
        BossAction::ALL
            .iter()
            .copied()
            .find(|action| action.token() == normalized)
            .ok_or_else(|| GameError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_serde_name() {
        for action in BossAction::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.token()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("spread_shot".parse::<BossAction>().unwrap(), BossAction::SpreadShot);
        assert_eq!("  Move-Left ".parse::<BossAction>().unwrap(), BossAction::MoveLeft);
    }

    #[test]
    fn test_parse_unknown_is_error() {
        let result = "BOGUS_ACTION".parse::<BossAction>();
        assert!(matches!(result, Err(GameError::UnknownAction(_))));
    }

    #[test]
    fn test_movement_is_not_attack() {
        assert!(!BossAction::MoveLeft.is_attack());
        assert!(!BossAction::Dodge.is_attack());
        assert!(BossAction::LayMines.is_attack());
        assert!(BossAction::LaserSweep.is_attack());
    }

    #[test]
    fn test_beam_legal_only_when_enraged() {
        assert!(!legal_actions(false).contains(&BossAction::LaserSweep));
        assert!(legal_actions(true).contains(&BossAction::LaserSweep));
    }

    #[test]
    fn test_summon_never_advisory_legal() {
        assert!(!legal_actions(false).contains(&BossAction::SummonMinions));
        assert!(!legal_actions(true).contains(&BossAction::SummonMinions));
    }
}
