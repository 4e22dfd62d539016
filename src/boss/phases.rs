//! Health thresholds, one-shot escalations and the boss's own timers
//!
//! Evaluation order each tick, all against the health ratio taken at the
//! start of the tick:
//! 1. periodic summon
//! 2. shield activation (at most one threshold)
//! 3. final stand latch
//! 4. enrage latch
//! 5. shield hold / expiry
//!
//! The latches run even while shielded so a single huge hit is answered
//! on the tick it lands. The last phase line set during evaluation is
//! returned in [`PhaseOutcome::dialogue`] and shown after the immediate
//! summons, so it is never overwritten by their taunt.

use rand::Rng;
use serde::Serialize;

use crate::boss::actions::BossAction;
use crate::boss::constants::*;
use crate::boss::state::BossState;
use crate::core::config::{EncounterConfig, PhaseConfig, ShieldConfig, TimingConfig};
use crate::core::types::{Direction, Millis};

/// Something noteworthy that happened to the boss this tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PhaseEvent {
    ShieldRaised { threshold: f32 },
    ShieldDropped { healed: f32 },
    Enraged,
    FinalStand,
    MinionsSummoned { count: usize },
    SummonRefused,
    ActionPerformed { action: BossAction },
    AdvisoryRequested,
}

/// Result of one phase evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseOutcome {
    /// Actions to perform right now, outside the queue
    pub immediate: Vec<BossAction>,
    pub events: Vec<PhaseEvent>,
    /// Shield up (or dropping this tick): skip sequencing, drift and passive fire
    pub holding: bool,
    /// Phase line to show once the immediate actions have run
    pub dialogue: Option<(&'static str, Millis)>,
}

#[derive(Debug, Clone)]
pub struct PhaseController {
    shield: ShieldConfig,
    phases: PhaseConfig,
    timing: TimingConfig,
    arena_width: f32,
    drift_speed: f32,
}

impl PhaseController {
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            shield: config.shield.clone(),
            phases: config.phases.clone(),
            timing: config.timing.clone(),
            arena_width: config.arena.width,
            drift_speed: config.boss.drift_speed,
        }
    }

    /// Run the threshold and latch checks for this tick
    pub fn evaluate(&self, boss: &mut BossState, now: Millis) -> PhaseOutcome {
        let ratio = boss.health_ratio();
        let mut outcome = PhaseOutcome::default();

        if now.saturating_sub(boss.timers.last_summon_at) >= self.timing.summon_interval_ms {
            boss.timers.last_summon_at = now;
            if !boss.shield.active {
                outcome.immediate.push(BossAction::SummonMinions);
            }
        }

        self.check_shield(boss, ratio, now, &mut outcome);

        if ratio < self.phases.final_stand_ratio && boss.flags.latch_final_stand() {
            tracing::info!("Boss: FINAL STAND at {:.0}% health", ratio * 100.0);
            let summons = self.phases.final_stand_summons as usize;
            outcome
                .immediate
                .extend(std::iter::repeat(BossAction::SummonMinions).take(summons));
            boss.queue.clear();
            boss.queue.push_back(BossAction::LaserSweep);
            outcome.dialogue = Some((FINAL_STAND_LINE, FINAL_STAND_LINE_MS));
            outcome.events.push(PhaseEvent::FinalStand);
        }

        if ratio < self.phases.enrage_ratio && boss.flags.latch_enraged() {
            tracing::info!("Boss: enraged at {:.0}% health", ratio * 100.0);
            boss.prepend_action(BossAction::LaserSweep);
            outcome.dialogue = Some((ENRAGE_LINE, ENRAGE_LINE_MS));
            outcome.events.push(PhaseEvent::Enraged);
        }

        if boss.shield.active {
            if now >= boss.shield.expires_at {
                boss.shield.active = false;
                let healed = boss.heal(boss.max_health() * self.shield.heal_fraction);
                tracing::info!("Boss: shield down, regained {:.0} health", healed);
                outcome.events.push(PhaseEvent::ShieldDropped { healed });
            }
            outcome.holding = true;
        }

        outcome
    }

    fn check_shield(&self, boss: &mut BossState, ratio: f32, now: Millis, outcome: &mut PhaseOutcome) {
        if boss.shield.active {
            return;
        }
        let Some(&threshold) = boss.shield.remaining_thresholds.front() else {
            return;
        };
        if ratio >= threshold {
            return;
        }

        boss.shield.remaining_thresholds.pop_front();
        boss.shield.active = true;
        boss.shield.expires_at = now + self.shield.duration_ms;
        boss.queue.clear();
        outcome.dialogue = Some((SHIELD_LINE, SHIELD_LINE_MS));
        tracing::info!("Boss: shield up below {:.0}%", threshold * 100.0);
        outcome.events.push(PhaseEvent::ShieldRaised { threshold });
    }

    /// Cheap shot on its own timer, independent of the queue
    pub fn passive_attack<R: Rng + ?Sized>(
        &self,
        boss: &mut BossState,
        now: Millis,
        rng: &mut R,
    ) -> Option<BossAction> {
        if now.saturating_sub(boss.timers.last_passive_at) < boss.timers.passive_interval_ms {
            return None;
        }
        boss.timers.last_passive_at = now;
        boss.timers.passive_interval_ms =
            rng.gen_range(self.timing.passive_min_ms..=self.timing.passive_max_ms);

        Some(if rng.gen_bool(0.5) {
            BossAction::SingleShot
        } else {
            BossAction::SpreadShot
        })
    }

    /// Wander sideways, re-rolling direction on a timer
    pub fn drift<R: Rng + ?Sized>(&self, boss: &mut BossState, now: Millis, rng: &mut R) {
        if now.saturating_sub(boss.drift.last_reroll_at) >= self.timing.drift_reroll_ms {
            boss.drift.last_reroll_at = now;
            boss.drift.direction = if rng.gen_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            };
        }

        boss.transform.center.x += boss.drift.direction.sign() * self.drift_speed;
        self.keep_in_arena(boss);
    }

    /// Clamp to the arena, bouncing the drift direction off the walls
    pub fn keep_in_arena(&self, boss: &mut BossState) {
        let half = boss.transform.half_extents.x;
        if boss.transform.left() < 0.0 {
            boss.transform.center.x = half;
            boss.drift.direction = Direction::Right;
        }
        if boss.transform.right() > self.arena_width {
            boss.transform.center.x = self.arena_width - half;
            boss.drift.direction = Direction::Left;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (PhaseController, BossState, StdRng) {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let boss = BossState::new(&config, 0, &mut rng);
        (PhaseController::new(&config), boss, rng)
    }

    #[test]
    fn test_full_health_is_quiet() {
        let (phases, mut boss, _) = setup();
        let outcome = phases.evaluate(&mut boss, 16);
        assert_eq!(outcome, PhaseOutcome::default());
    }

    #[test]
    fn test_shield_consumes_one_threshold_per_tick() {
        let (phases, mut boss, _) = setup();
        boss.set_health(2500.0 * 0.6);
        boss.queue.push_back(BossAction::SingleShot);

        let outcome = phases.evaluate(&mut boss, 100);
        assert!(boss.shield.active);
        assert_eq!(boss.shield.expires_at, 4_100);
        assert_eq!(boss.shield.remaining_thresholds, vec![0.5, 0.25]);
        assert!(boss.queue.is_empty());
        assert!(outcome.holding);
        assert_eq!(outcome.events, vec![PhaseEvent::ShieldRaised { threshold: 0.75 }]);

        // Still below 0.5 but already shielded: nothing more consumed
        phases.evaluate(&mut boss, 116);
        assert_eq!(boss.shield.remaining_thresholds.len(), 2);
    }

    #[test]
    fn test_shield_drops_at_expiry_and_heals() {
        let (phases, mut boss, _) = setup();
        boss.set_health(1_800.0);
        phases.evaluate(&mut boss, 0);

        assert!(phases.evaluate(&mut boss, 3_999).holding);
        assert!(boss.shield.active);

        let outcome = phases.evaluate(&mut boss, 4_000);
        assert!(!boss.shield.active);
        assert!(outcome.holding);
        assert_eq!(outcome.events, vec![PhaseEvent::ShieldDropped { healed: 125.0 }]);
        assert_eq!(boss.health(), 1_925.0);
    }

    #[test]
    fn test_shield_blocks_damage_while_up() {
        let (phases, mut boss, _) = setup();
        boss.set_health(1_800.0);
        phases.evaluate(&mut boss, 0);
        assert_eq!(boss.apply_damage(500.0), 0.0);
        assert_eq!(boss.health(), 1_800.0);
    }

    #[test]
    fn test_enrage_prepends_beam() {
        let (phases, mut boss, _) = setup();
        boss.shield.remaining_thresholds.clear();
        boss.queue.push_back(BossAction::SingleShot);
        boss.set_health(1_000.0);

        let outcome = phases.evaluate(&mut boss, 0);
        assert!(boss.flags.enraged());
        assert_eq!(boss.queue.front(), Some(&BossAction::LaserSweep));
        assert_eq!(boss.queue.len(), 2);
        assert_eq!(outcome.events, vec![PhaseEvent::Enraged]);
        assert_eq!(outcome.dialogue, Some((ENRAGE_LINE, ENRAGE_LINE_MS)));

        // Latch fires once
        let again = phases.evaluate(&mut boss, 16);
        assert!(again.events.is_empty());
        assert_eq!(boss.queue.len(), 2);
    }

    #[test]
    fn test_final_stand_summons_twice() {
        let (phases, mut boss, _) = setup();
        boss.set_health(2500.0 * 0.09);

        let outcome = phases.evaluate(&mut boss, 0);
        assert_eq!(
            outcome.immediate,
            vec![BossAction::SummonMinions, BossAction::SummonMinions]
        );
        assert!(boss.flags.final_stand_activated());
        assert!(boss.flags.desperation_mode());
        assert!(boss.flags.enraged());
        assert_eq!(boss.shield.remaining_thresholds.len(), 2);
        assert!(boss.shield.active);
        assert!(outcome.events.contains(&PhaseEvent::FinalStand));
        assert!(outcome.holding);
        // Enrage latched last, so its line wins
        assert_eq!(outcome.dialogue, Some((ENRAGE_LINE, ENRAGE_LINE_MS)));
    }

    #[test]
    fn test_periodic_summon_skipped_when_shielded() {
        let (phases, mut boss, _) = setup();
        boss.shield.active = true;
        boss.shield.expires_at = 60_000;

        let outcome = phases.evaluate(&mut boss, 30_000);
        assert!(outcome.immediate.is_empty());
        assert_eq!(boss.timers.last_summon_at, 30_000);
    }

    #[test]
    fn test_periodic_summon_fires_on_interval() {
        let (phases, mut boss, _) = setup();
        assert!(phases.evaluate(&mut boss, 29_999).immediate.is_empty());
        assert_eq!(
            phases.evaluate(&mut boss, 30_000).immediate,
            vec![BossAction::SummonMinions]
        );
        assert!(phases.evaluate(&mut boss, 30_016).immediate.is_empty());
    }

    #[test]
    fn test_passive_attack_rerolls_interval() {
        let (phases, mut boss, mut rng) = setup();
        let interval = boss.timers.passive_interval_ms;
        assert!(phases.passive_attack(&mut boss, interval - 1, &mut rng).is_none());

        let shot = phases.passive_attack(&mut boss, interval, &mut rng);
        assert!(matches!(
            shot,
            Some(BossAction::SingleShot) | Some(BossAction::SpreadShot)
        ));
        assert_eq!(boss.timers.last_passive_at, interval);
        assert!((1_500..=2_500).contains(&boss.timers.passive_interval_ms));
    }

    #[test]
    fn test_drift_bounces_off_wall() {
        let (phases, mut boss, mut rng) = setup();
        boss.transform.center.x = 798.0;
        boss.drift.direction = Direction::Right;

        phases.drift(&mut boss, 16, &mut rng);
        assert_eq!(boss.transform.right(), 800.0);
        assert_eq!(boss.drift.direction, Direction::Left);
    }

    #[test]
    fn test_drift_moves_three_pixels() {
        let (phases, mut boss, mut rng) = setup();
        boss.drift.direction = Direction::Left;
        phases.drift(&mut boss, 16, &mut rng);
        assert_eq!(boss.transform.center.x, 397.0);
    }
}
