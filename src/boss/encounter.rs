//! One boss fight: the boss, its arena and its RNG behind a tick interface
//!
//! The surrounding game calls [`Encounter::apply_damage`] when player fire
//! lands and [`Encounter::tick`] once per frame. Everything the boss does
//! comes back in the [`BossTickReport`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::arena::{Arena, ArenaBounds};
use crate::boss::actions::BossAction;
use crate::boss::advisory::AdvisoryAdapter;
use crate::boss::catalog::{self, CastContext, Maneuver};
use crate::boss::constants::{INTRO_LINE, INTRO_MS};
use crate::boss::phases::{PhaseController, PhaseEvent};
use crate::boss::sequencer::ActionSequencer;
use crate::boss::spawns::Spawn;
use crate::boss::state::BossState;
use crate::core::config::EncounterConfig;
use crate::core::error::Result;
use crate::core::types::{Millis, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterOutcome {
    InProgress,
    BossDefeated,
}

/// Everything the boss produced during one tick
#[derive(Debug, Clone, Serialize)]
pub struct BossTickReport {
    pub now: Millis,
    pub spawns: Vec<Spawn>,
    /// Line currently on screen, if any
    pub dialogue: Option<String>,
    /// Damage that actually landed since the previous tick
    pub damage_taken: f32,
    pub events: Vec<PhaseEvent>,
    /// Shield is holding the boss in place
    pub holding: bool,
    /// An advisory request is outstanding
    pub thinking: bool,
    pub desperation: bool,
    pub arena: ArenaBounds,
    pub health: f32,
    pub outcome: EncounterOutcome,
}

impl BossTickReport {
    pub fn count_events(&self, predicate: impl Fn(&PhaseEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

pub struct Encounter {
    config: EncounterConfig,
    boss: BossState,
    arena: Arena,
    phases: PhaseController,
    sequencer: ActionSequencer,
    adapter: AdvisoryAdapter,
    rng: ChaCha8Rng,
    damage_since_tick: f32,
    outcome: EncounterOutcome,
}

impl Encounter {
    /// Bring the boss on stage at `now`
    ///
    /// Fails if `config` does not pass [`EncounterConfig::validate`].
    pub fn begin(
        config: EncounterConfig,
        adapter: AdvisoryAdapter,
        seed: u64,
        now: Millis,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut boss = BossState::new(&config, now, &mut rng);
        boss.set_dialogue(INTRO_LINE, now, INTRO_MS);

        tracing::info!(
            "Encounter '{}' begins: boss at {} health, advisor {}",
            config.name,
            boss.max_health(),
            if adapter.is_enabled() { "on" } else { "off" }
        );

        Ok(Self {
            arena: Arena::new(&config.arena),
            phases: PhaseController::new(&config),
            sequencer: ActionSequencer::new(),
            config,
            boss,
            adapter,
            rng,
            damage_since_tick: 0.0,
            outcome: EncounterOutcome::InProgress,
        })
    }

    pub fn boss(&self) -> &BossState {
        &self.boss
    }

    /// Direct access for scripted scenarios
    pub fn boss_mut(&mut self) -> &mut BossState {
        &mut self.boss
    }

    pub fn outcome(&self) -> EncounterOutcome {
        self.outcome
    }

    /// Player fire hitting the boss; returns the damage that landed
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        if self.outcome == EncounterOutcome::BossDefeated {
            return 0.0;
        }

        let landed = self.boss.apply_damage(amount);
        self.damage_since_tick += landed;

        if self.boss.is_defeated() {
            tracing::info!("Boss defeated");
            self.outcome = EncounterOutcome::BossDefeated;
        }
        landed
    }

    /// Advance the boss by one frame
    pub fn tick(&mut self, now: Millis, player: Vec2, hostile_count: usize) -> BossTickReport {
        let mut report = BossTickReport {
            now,
            spawns: Vec::new(),
            dialogue: None,
            damage_taken: std::mem::take(&mut self.damage_since_tick),
            events: Vec::new(),
            holding: false,
            thinking: false,
            desperation: false,
            arena: self.arena.bounds(),
            health: self.boss.health(),
            outcome: self.outcome,
        };
        if self.outcome == EncounterOutcome::BossDefeated {
            return report;
        }

        // Results can land while the shield holds the sequencer
        self.boss.mailbox.poll();

        let mut hostiles = hostile_count;
        let phase = self.phases.evaluate(&mut self.boss, now);
        report.events.extend(phase.events);
        report.holding = phase.holding;

        for action in phase.immediate {
            self.perform(action, now, player, &mut hostiles, &mut report);
        }
        if let Some((text, duration_ms)) = phase.dialogue {
            self.boss.set_dialogue(text, now, duration_ms);
        }

        if !phase.holding {
            let step = self.sequencer.step(&mut self.boss, &self.adapter, now);
            if step.requested {
                report.events.push(PhaseEvent::AdvisoryRequested);
            }
            if let Some(action) = step.action {
                tracing::debug!("Boss: {}", action);
                self.perform(action, now, player, &mut hostiles, &mut report);
                report.events.push(PhaseEvent::ActionPerformed { action });
            }

            self.phases.drift(&mut self.boss, now, &mut self.rng);

            if let Some(action) = self.phases.passive_attack(&mut self.boss, now, &mut self.rng) {
                self.perform(action, now, player, &mut hostiles, &mut report);
            }
        }

        if self.boss.flags.desperation_mode() {
            self.arena.shrink();
        }

        report.dialogue = self.boss.active_dialogue(now).map(str::to_string);
        report.thinking = self.boss.mailbox.in_flight();
        report.desperation = self.boss.flags.desperation_mode();
        report.arena = self.arena.bounds();
        report.health = self.boss.health();
        report
    }

    fn perform(
        &mut self,
        action: BossAction,
        now: Millis,
        player: Vec2,
        hostiles: &mut usize,
        report: &mut BossTickReport,
    ) {
        let cx = CastContext {
            config: &self.config,
            transform: self.boss.transform,
            player,
            hostile_count: *hostiles,
            now,
        };
        let effect = catalog::perform(action, &cx, &mut self.rng);

        if action == BossAction::SummonMinions {
            if effect.refused {
                report.events.push(PhaseEvent::SummonRefused);
            } else {
                *hostiles += effect.spawns.len();
                report.events.push(PhaseEvent::MinionsSummoned {
                    count: effect.spawns.len(),
                });
            }
        }

        if let Some((text, duration_ms)) = effect.dialogue {
            self.boss.set_dialogue(text, now, duration_ms);
        }

        match effect.maneuver {
            Some(Maneuver::Drift(direction)) => self.boss.drift.direction = direction,
            Some(Maneuver::Jump(dx)) => {
                self.boss.transform.center.x += dx;
                self.phases.keep_in_arena(&mut self.boss);
            }
            None => {}
        }

        report.spawns.extend(effect.spawns);
    }
}
