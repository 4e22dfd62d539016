//! Boss context for advisor prompts
//!
//! The advisor sees three things: how hurt the boss is, whether it is
//! enraged, and which actions it may pick from right now.

use serde::Serialize;

use crate::boss::actions::{legal_actions, BossAction};
use crate::boss::state::BossState;

/// Snapshot sent to the advisor when a new sequence is needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    /// 0..=100, truncated
    pub health_percent: u8,
    pub enraged: bool,
    pub legal_actions: Vec<BossAction>,
}

impl AdvisoryRequest {
    pub fn new(health_percent: u8, enraged: bool) -> Self {
        Self {
            health_percent: health_percent.min(100),
            enraged,
            legal_actions: legal_actions(enraged),
        }
    }

    pub fn from_boss(boss: &BossState) -> Self {
        Self::new(boss.health_percent(), boss.flags.enraged())
    }

    /// Instructions plus the legal action list
    pub fn system_prompt(&self) -> String {
        let actions = self
            .legal_actions
            .iter()
            .map(|a| a.token())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are the AI for an aggressive boss in a retro arcade shooter. \
             Your available actions are: {}. \
             Based on your current status, decide on a comma-separated sequence of 3 to 4 actions. \
             The sequence must include at least two attack actions. \
             Respond with ONLY the comma-separated list. \
             Example: SPREAD_SHOT,MOVE_LEFT,HOMING_MISSILE",
            actions
        )
    }

    /// Current status line
    pub fn user_prompt(&self) -> String {
        format!(
            "My Health: {}%. Enraged? {}.",
            self.health_percent,
            if self.enraged { "Yes" } else { "No" }
        )
    }
}
