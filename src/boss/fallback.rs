//! Scripted sequence used whenever the advisor is absent or unhelpful

use crate::boss::actions::BossAction;

/// Fixed, always-available plan
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPlanner;

impl FallbackPlanner {
    const SEQUENCE: [BossAction; 5] = [
        BossAction::SpreadShot,
        BossAction::MoveRight,
        BossAction::CircleShot,
        BossAction::MoveLeft,
        BossAction::SingleShot,
    ];

    pub fn plan(&self) -> Vec<BossAction> {
        Self::SEQUENCE.to_vec()
    }
}
