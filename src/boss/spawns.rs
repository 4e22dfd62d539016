//! Spawn descriptors produced by boss actions
//!
//! The surrounding engine instantiates and owns these. Each kind carries the
//! small amount of behavior its timing depends on, so the engine can ask a
//! mine whether it is live or a beam whether it is still charging without
//! re-deriving the rules.

use serde::Serialize;

use crate::boss::constants::*;
use crate::core::types::{Millis, Vec2};

/// Entity type tag for the spawning system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpawnKind {
    Bullet,
    Beam,
    HomingMissile,
    Mine,
    Minion,
}

/// Plain boss bullet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bullet {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Bullet {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        off_screen(self.position, BULLET_SIZE, width, height)
    }
}

/// Sub-state of a sweeping beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BeamPhase {
    /// Warning line, deals no damage
    Charging,
    /// Full-width damaging beam
    Firing,
    Expired,
}

/// Charge-then-fire beam hanging below the boss
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beam {
    /// Top-center of the beam; x follows the boss
    pub origin: Vec2,
    pub spawned_at: Millis,
}

impl Beam {
    pub fn new(origin: Vec2, spawned_at: Millis) -> Self {
        Self { origin, spawned_at }
    }

    pub fn phase_at(&self, now: Millis) -> BeamPhase {
        let age = now.saturating_sub(self.spawned_at);
        if age < BEAM_CHARGE_MS {
            BeamPhase::Charging
        } else if age < BEAM_LIFETIME_MS {
            BeamPhase::Firing
        } else {
            BeamPhase::Expired
        }
    }

    pub fn width_at(&self, now: Millis) -> f32 {
        match self.phase_at(now) {
            BeamPhase::Charging => BEAM_CHARGE_WIDTH,
            BeamPhase::Firing => BEAM_FIRE_WIDTH,
            BeamPhase::Expired => 0.0,
        }
    }

    pub fn is_hazardous(&self, now: Millis) -> bool {
        self.phase_at(now) == BeamPhase::Firing
    }

    /// Keep the beam under the boss as it drifts
    pub fn track(&mut self, boss_x: f32) {
        self.origin.x = boss_x;
    }
}

/// Missile that periodically re-aims at the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomingMissile {
    pub position: Vec2,
    /// Unit vector of travel
    pub heading: Vec2,
    pub speed: f32,
    updates: u32,
}

impl HomingMissile {
    pub fn new(position: Vec2, target: Vec2) -> Self {
        let aim = (target - position).normalize();
        let heading = if aim == Vec2::ZERO { Vec2::new(0.0, 1.0) } else { aim };
        Self {
            position,
            heading,
            speed: MISSILE_SPEED,
            updates: 0,
        }
    }

    /// Move one tick; every third tick the heading snaps toward `target`
    pub fn advance(&mut self, target: Vec2) {
        self.updates += 1;
        if self.updates % MISSILE_RETARGET_EVERY == 0 {
            let aim = (target - self.position).normalize();
            if aim != Vec2::ZERO {
                self.heading = aim;
            }
        }
        self.position += self.heading * self.speed;
    }

    pub fn velocity(&self) -> Vec2 {
        self.heading * self.speed
    }

    /// Sprite rotation: the missile always faces where it is going
    pub fn facing_degrees(&self) -> f32 {
        self.heading.y.atan2(self.heading.x).to_degrees()
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        off_screen(self.position, BULLET_SIZE, width, height)
    }
}

/// Lifecycle of a mine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MinePhase {
    /// Blinking, harmless
    Arming,
    Live,
    /// Past its lifetime; the engine removes it
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mine {
    pub position: Vec2,
    pub spawned_at: Millis,
}

impl Mine {
    pub fn new(position: Vec2, spawned_at: Millis) -> Self {
        Self { position, spawned_at }
    }

    pub fn phase_at(&self, now: Millis) -> MinePhase {
        let age = now.saturating_sub(self.spawned_at);
        if age < MINE_ARMING_MS {
            MinePhase::Arming
        } else if age < MINE_LIFETIME_MS {
            MinePhase::Live
        } else {
            MinePhase::Expired
        }
    }

    pub fn is_hazardous(&self, now: Millis) -> bool {
        self.phase_at(now) == MinePhase::Live
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        self.phase_at(now) == MinePhase::Expired
    }

    /// Whether the arming blink is in its visible half
    pub fn blink_on(&self, now: Millis) -> bool {
        self.phase_at(now) != MinePhase::Arming || (now / MINE_BLINK_MS) % 2 == 0
    }
}

/// Basic enemy summoned by the boss
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Minion {
    pub position: Vec2,
    /// Falling speed in pixels per tick
    pub speed: f32,
    pub health: f32,
}

/// One entity-creation request for the spawning system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Spawn {
    Bullet(Bullet),
    Beam(Beam),
    Missile(HomingMissile),
    Mine(Mine),
    Minion(Minion),
}

impl Spawn {
    pub fn kind(&self) -> SpawnKind {
        match self {
            Spawn::Bullet(_) => SpawnKind::Bullet,
            Spawn::Beam(_) => SpawnKind::Beam,
            Spawn::Missile(_) => SpawnKind::HomingMissile,
            Spawn::Mine(_) => SpawnKind::Mine,
            Spawn::Minion(_) => SpawnKind::Minion,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Spawn::Bullet(b) => b.position,
            Spawn::Beam(b) => b.origin,
            Spawn::Missile(m) => m.position,
            Spawn::Mine(m) => m.position,
            Spawn::Minion(m) => m.position,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        match self {
            Spawn::Bullet(b) => b.velocity,
            Spawn::Missile(m) => m.velocity(),
            Spawn::Minion(m) => Vec2::new(0.0, m.speed),
            Spawn::Beam(_) | Spawn::Mine(_) => Vec2::ZERO,
        }
    }
}

fn off_screen(position: Vec2, size: f32, width: f32, height: f32) -> bool {
    position.x + size < 0.0
        || position.x - size > width
        || position.y + size < 0.0
        || position.y - size > height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mine_hazard_window() {
        let mine = Mine::new(Vec2::new(100.0, 200.0), 5_000);
        assert_eq!(mine.phase_at(5_000), MinePhase::Arming);
        assert!(!mine.is_hazardous(5_999));
        assert!(mine.is_hazardous(6_000));
        assert!(mine.is_hazardous(12_999));
        assert!(!mine.is_hazardous(13_000));
        assert!(mine.is_expired(13_000));
    }

    #[test]
    fn test_mine_blinks_only_while_arming() {
        let mine = Mine::new(Vec2::ZERO, 0);
        assert!(mine.blink_on(0));
        assert!(!mine.blink_on(150));
        assert!(mine.blink_on(300));
        // Once live it stays visible
        assert!(mine.blink_on(1_150));
    }

    #[test]
    fn test_beam_phases() {
        let beam = Beam::new(Vec2::new(400.0, 130.0), 1_000);
        assert_eq!(beam.phase_at(1_999), BeamPhase::Charging);
        assert!(!beam.is_hazardous(1_500));
        assert_eq!(beam.phase_at(2_000), BeamPhase::Firing);
        assert_eq!(beam.width_at(2_500), BEAM_FIRE_WIDTH);
        assert_eq!(beam.phase_at(3_000), BeamPhase::Expired);
    }

    #[test]
    fn test_beam_tracks_boss() {
        let mut beam = Beam::new(Vec2::new(400.0, 130.0), 0);
        beam.track(250.0);
        assert_eq!(beam.origin.x, 250.0);
        assert_eq!(beam.origin.y, 130.0);
    }

    #[test]
    fn test_missile_retargets_every_third_tick() {
        let mut missile = HomingMissile::new(Vec2::ZERO, Vec2::new(0.0, 100.0));
        assert_eq!(missile.heading, Vec2::new(0.0, 1.0));

        // Player jumps to the right; first two ticks keep the old heading
        let target = Vec2::new(100.0, 0.0);
        missile.advance(target);
        missile.advance(target);
        assert_eq!(missile.heading, Vec2::new(0.0, 1.0));
        assert!((missile.position.y - 6.0).abs() < 1e-4);

        missile.advance(target);
        assert!(missile.heading.x > 0.9);
        assert!(missile.velocity().length() > 2.99);
    }

    #[test]
    fn test_missile_faces_velocity() {
        let missile = HomingMissile::new(Vec2::ZERO, Vec2::new(0.0, 50.0));
        assert!((missile.facing_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_leaves_screen() {
        let mut bullet = Bullet::new(Vec2::new(400.0, 590.0), Vec2::new(0.0, 8.0));
        assert!(!bullet.is_off_screen(800.0, 600.0));
        bullet.advance();
        bullet.advance();
        bullet.advance();
        assert!(bullet.is_off_screen(800.0, 600.0));
    }

    #[test]
    fn test_spawn_descriptor_fields() {
        let spawn = Spawn::Minion(Minion {
            position: Vec2::new(10.0, -60.0),
            speed: 3.0,
            health: MINION_HEALTH,
        });
        assert_eq!(spawn.kind(), SpawnKind::Minion);
        assert_eq!(spawn.velocity(), Vec2::new(0.0, 3.0));
    }
}
