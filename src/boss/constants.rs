//! Boss attack constants - spawn geometry and lifetimes in one place
//!
//! Speeds are pixels per tick, times are milliseconds of simulation clock.

use crate::core::types::Millis;

// Bullets
pub const SINGLE_SHOT_SPEED: f32 = 8.0;
pub const SPREAD_SHOT_SPEED: f32 = 5.0;
pub const SPREAD_SHOT_LATERAL: f32 = 3.0;
pub const VOLLEY_SHOT_SPEED: f32 = 7.0;
pub const VOLLEY_SHOT_SPACING: f32 = 40.0;
pub const VOLLEY_SHOT_COUNT: usize = 3;
pub const CIRCLE_SHOT_COUNT: usize = 12;
pub const CIRCLE_SHOT_SPEED: f32 = 4.0;
pub const BULLET_SIZE: f32 = 12.0;

// Beam: charge, then fire, then gone
pub const BEAM_CHARGE_MS: Millis = 1000;
pub const BEAM_LIFETIME_MS: Millis = 2000;
pub const BEAM_CHARGE_WIDTH: f32 = 10.0;
pub const BEAM_FIRE_WIDTH: f32 = 80.0;

// Homing missile
pub const MISSILE_SPEED: f32 = 3.0;
pub const MISSILE_RETARGET_EVERY: u32 = 3;

// Mines
pub const MINE_COUNT_MIN: u32 = 3;
pub const MINE_COUNT_MAX: u32 = 5;
pub const MINE_SCATTER_X: i32 = 250;
pub const MINE_DROP_MIN: i32 = 50;
pub const MINE_DROP_MAX: i32 = 250;
pub const MINE_EDGE_MARGIN: f32 = 20.0;
pub const MINE_MIN_Y: f32 = 150.0;
pub const MINE_BOTTOM_MARGIN: f32 = 100.0;
pub const MINE_ARMING_MS: Millis = 1000;
pub const MINE_LIFETIME_MS: Millis = 8000;
pub const MINE_BLINK_MS: Millis = 150;

// Minions
pub const MINION_WIDTH: f32 = 32.0;
pub const MINION_SPAWN_Y_MIN: i32 = -150;
pub const MINION_SPAWN_Y_MAX: i32 = -50;
pub const MINION_SPEED_MIN: u32 = 1;
pub const MINION_SPEED_MAX: u32 = 4;
pub const MINION_HEALTH: f32 = 10.0;

// Dialogue
pub const INTRO_LINE: &str = "I am powered by a vast intelligence...";
pub const INTRO_MS: Millis = 5000;
pub const SHIELD_LINE: &str = "You cannot pierce this barrier!";
pub const SHIELD_LINE_MS: Millis = 3000;
pub const ENRAGE_LINE: &str = "ENOUGH! FEEL MY WRATH!";
pub const ENRAGE_LINE_MS: Millis = 3000;
pub const FINAL_STAND_LINE: &str = "I WILL NOT BE DEFEATED!";
pub const FINAL_STAND_LINE_MS: Millis = 4000;
pub const MINES_LINE: &str = "Watch your step!";
pub const MINES_LINE_MS: Millis = 2000;
pub const SUMMON_LINE: &str = "My servants will destroy you!";
pub const SUMMON_LINE_MS: Millis = 3000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_fires_after_charging() {
        assert!(BEAM_CHARGE_MS < BEAM_LIFETIME_MS);
        assert!(BEAM_FIRE_WIDTH > BEAM_CHARGE_WIDTH);
    }

    #[test]
    fn test_mine_arms_before_expiring() {
        assert!(MINE_ARMING_MS < MINE_LIFETIME_MS);
        assert!(MINE_COUNT_MIN <= MINE_COUNT_MAX);
    }
}
