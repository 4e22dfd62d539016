//! Direct effects of each boss action
//!
//! `perform` is a pure function of the action, the boss transform and the
//! encounter RNG. It never touches boss state; the caller applies the
//! returned dialogue and maneuver.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::boss::actions::BossAction;
use crate::boss::constants::*;
use crate::boss::spawns::{Beam, Bullet, HomingMissile, Mine, Minion, Spawn};
use crate::boss::state::BossTransform;
use crate::core::config::EncounterConfig;
use crate::core::types::{Direction, Millis, Vec2};

/// Everything an action needs to know about the world
pub struct CastContext<'a> {
    pub config: &'a EncounterConfig,
    pub transform: BossTransform,
    pub player: Vec2,
    /// Hostiles currently alive, used by the summon cap
    pub hostile_count: usize,
    pub now: Millis,
}

/// Change to the boss's own movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maneuver {
    /// Switch drift direction
    Drift(Direction),
    /// Instant lateral offset in pixels
    Jump(f32),
}

/// What performing an action produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionEffect {
    pub spawns: Vec<Spawn>,
    pub dialogue: Option<(&'static str, Millis)>,
    pub maneuver: Option<Maneuver>,
    /// Set when a summon was turned away by the population cap
    pub refused: bool,
}

impl ActionEffect {
    fn spawns(spawns: Vec<Spawn>) -> Self {
        Self {
            spawns,
            ..Self::default()
        }
    }

    fn maneuver(maneuver: Maneuver) -> Self {
        Self {
            maneuver: Some(maneuver),
            ..Self::default()
        }
    }
}

/// Perform one action
pub fn perform<R: Rng + ?Sized>(action: BossAction, cx: &CastContext, rng: &mut R) -> ActionEffect {
    let muzzle = cx.transform.bottom_center();

    match action {
        BossAction::SingleShot => ActionEffect::spawns(vec![bullet(muzzle, 0.0, SINGLE_SHOT_SPEED)]),
        BossAction::SpreadShot => ActionEffect::spawns(
            (-1..=1)
                .map(|i| bullet(muzzle, i as f32 * SPREAD_SHOT_LATERAL, SPREAD_SHOT_SPEED))
                .collect(),
        ),
        BossAction::VolleyShot => ActionEffect::spawns(
            (0..VOLLEY_SHOT_COUNT)
                .map(|i| {
                    let origin = Vec2::new(muzzle.x, muzzle.y + i as f32 * VOLLEY_SHOT_SPACING);
                    bullet(origin, 0.0, VOLLEY_SHOT_SPEED)
                })
                .collect(),
        ),
        BossAction::CircleShot => ActionEffect::spawns(radial_burst(cx.transform.center)),
        BossAction::LaserSweep => {
            tracing::debug!("Boss: laser sweep");
            ActionEffect::spawns(vec![Spawn::Beam(Beam::new(muzzle, cx.now))])
        }
        BossAction::HomingMissile => {
            ActionEffect::spawns(vec![Spawn::Missile(HomingMissile::new(muzzle, cx.player))])
        }
        BossAction::LayMines => ActionEffect {
            spawns: lay_mines(cx, rng),
            dialogue: Some((MINES_LINE, MINES_LINE_MS)),
            ..ActionEffect::default()
        },
        BossAction::SummonMinions => summon_minions(cx, rng),
        BossAction::Dodge => {
            let sign = [-1.0_f32, 1.0].choose(rng).copied().unwrap_or(1.0);
            ActionEffect::maneuver(Maneuver::Jump(sign * cx.config.boss.dodge_distance))
        }
        BossAction::MoveLeft => ActionEffect::maneuver(Maneuver::Drift(Direction::Left)),
        BossAction::MoveRight => ActionEffect::maneuver(Maneuver::Drift(Direction::Right)),
    }
}

fn bullet(origin: Vec2, vx: f32, vy: f32) -> Spawn {
    Spawn::Bullet(Bullet::new(origin, Vec2::new(vx, vy)))
}

fn radial_burst(center: Vec2) -> Vec<Spawn> {
    let step = 360.0 / CIRCLE_SHOT_COUNT as f32;
    (0..CIRCLE_SHOT_COUNT)
        .map(|i| {
            let velocity = Vec2::from_angle_degrees(i as f32 * step) * CIRCLE_SHOT_SPEED;
            Spawn::Bullet(Bullet::new(center, velocity))
        })
        .collect()
}

fn lay_mines<R: Rng + ?Sized>(cx: &CastContext, rng: &mut R) -> Vec<Spawn> {
    let arena = &cx.config.arena;
    let center_x = cx.transform.center.x;
    let bottom = cx.transform.bottom();
    let count = rng.gen_range(MINE_COUNT_MIN..=MINE_COUNT_MAX);

    (0..count)
        .map(|_| {
            let x = center_x + rng.gen_range(-MINE_SCATTER_X..=MINE_SCATTER_X) as f32;
            let y = bottom + rng.gen_range(MINE_DROP_MIN..=MINE_DROP_MAX) as f32;
            let position = Vec2::new(
                x.clamp(MINE_EDGE_MARGIN, arena.width - MINE_EDGE_MARGIN),
                y.clamp(MINE_MIN_Y, arena.height - MINE_BOTTOM_MARGIN),
            );
            Spawn::Mine(Mine::new(position, cx.now))
        })
        .collect()
}

fn summon_minions<R: Rng + ?Sized>(cx: &CastContext, rng: &mut R) -> ActionEffect {
    let limits = &cx.config.minions;
    if cx.hostile_count > limits.population_cap {
        tracing::debug!(
            "Boss: too many minions ({} > {}), summon refused",
            cx.hostile_count,
            limits.population_cap
        );
        return ActionEffect {
            refused: true,
            ..ActionEffect::default()
        };
    }

    let count = rng.gen_range(limits.min_per_summon..=limits.max_per_summon);
    let max_x = (cx.config.arena.width - MINION_WIDTH).max(1.0) as i32;
    let spawns = (0..count)
        .map(|_| {
            Spawn::Minion(Minion {
                position: Vec2::new(
                    rng.gen_range(0..max_x) as f32,
                    rng.gen_range(MINION_SPAWN_Y_MIN..MINION_SPAWN_Y_MAX) as f32,
                ),
                speed: rng.gen_range(MINION_SPEED_MIN..=MINION_SPEED_MAX) as f32,
                health: MINION_HEALTH,
            })
        })
        .collect();

    tracing::debug!("Boss: summoned {} minions", count);
    ActionEffect {
        spawns,
        dialogue: Some((SUMMON_LINE, SUMMON_LINE_MS)),
        ..ActionEffect::default()
    }
}
