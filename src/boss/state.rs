//! Boss state owned by the tick loop
//!
//! Everything here is mutated only by the simulation thread. The one field
//! the background advisory task reaches is the [`AdvisoryMailbox`], and it
//! does so through a single-use channel rather than shared memory.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use crate::boss::actions::BossAction;
use crate::boss::advisory::AdvisoryMailbox;
use crate::core::config::EncounterConfig;
use crate::core::types::{Direction, Millis, Vec2};

/// Escalation latches
///
/// Monotonic: each flag can be set, never cleared, for the life of the
/// encounter. Health regained from a shield drop does not undo them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseFlags {
    enraged: bool,
    desperation_mode: bool,
    final_stand_activated: bool,
}

impl PhaseFlags {
    pub fn enraged(&self) -> bool {
        self.enraged
    }

    pub fn desperation_mode(&self) -> bool {
        self.desperation_mode
    }

    pub fn final_stand_activated(&self) -> bool {
        self.final_stand_activated
    }

    /// Returns true only on the call that flips the latch
    pub fn latch_enraged(&mut self) -> bool {
        !std::mem::replace(&mut self.enraged, true)
    }

    /// Final stand implies desperation; both latch together
    pub fn latch_final_stand(&mut self) -> bool {
        self.desperation_mode = true;
        !std::mem::replace(&mut self.final_stand_activated, true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShieldState {
    pub active: bool,
    pub expires_at: Millis,
    /// Descending health-ratio breakpoints, consumed from the front
    pub remaining_thresholds: VecDeque<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownState {
    pub last_action_at: Option<Millis>,
    pub action_cooldown_ms: Millis,
    pub last_advisory_request_at: Option<Millis>,
    pub advisory_cooldown_ms: Millis,
}

impl CooldownState {
    pub fn action_ready(&self, now: Millis) -> bool {
        self.last_action_at
            .map_or(true, |last| now.saturating_sub(last) >= self.action_cooldown_ms)
    }

    pub fn advisory_ready(&self, now: Millis) -> bool {
        self.last_advisory_request_at
            .map_or(true, |last| now.saturating_sub(last) >= self.advisory_cooldown_ms)
    }
}

/// Line of boss dialogue shown until `expires_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialogue {
    pub text: String,
    pub expires_at: Millis,
}

/// Boss body: center point plus half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossTransform {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BossTransform {
    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.center.x, self.bottom())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriftState {
    pub direction: Direction,
    pub last_reroll_at: Millis,
}

/// Timers that fire independently of the action queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTimers {
    pub last_summon_at: Millis,
    pub last_passive_at: Millis,
    pub passive_interval_ms: Millis,
}

/// Complete boss state for one encounter
#[derive(Debug)]
pub struct BossState {
    health: f32,
    max_health: f32,
    pub flags: PhaseFlags,
    pub shield: ShieldState,
    /// Pending actions, executed front to back
    pub queue: VecDeque<BossAction>,
    pub mailbox: AdvisoryMailbox,
    pub cooldowns: CooldownState,
    pub dialogue: Option<Dialogue>,
    pub transform: BossTransform,
    pub drift: DriftState,
    pub timers: PhaseTimers,
}

impl BossState {
    /// Fresh boss at full health, arriving at `now`
    pub fn new<R: Rng + ?Sized>(config: &EncounterConfig, now: Millis, rng: &mut R) -> Self {
        let half_extents = Vec2::new(config.boss.width / 2.0, config.boss.height / 2.0);
        let center = Vec2::new(
            config.arena.width / 2.0,
            config.boss.spawn_top + half_extents.y,
        );

        Self {
            health: config.boss.max_health,
            max_health: config.boss.max_health,
            flags: PhaseFlags::default(),
            shield: ShieldState {
                active: false,
                expires_at: 0,
                remaining_thresholds: config.shield.thresholds.iter().copied().collect(),
            },
            queue: VecDeque::new(),
            mailbox: AdvisoryMailbox::default(),
            cooldowns: CooldownState {
                last_action_at: None,
                action_cooldown_ms: config.timing.action_cooldown_ms,
                last_advisory_request_at: None,
                advisory_cooldown_ms: config.advisory.cooldown_ms,
            },
            dialogue: None,
            transform: BossTransform {
                center,
                half_extents,
            },
            drift: DriftState {
                direction: Direction::Right,
                last_reroll_at: now,
            },
            timers: PhaseTimers {
                last_summon_at: now,
                last_passive_at: now,
                passive_interval_ms: rng
                    .gen_range(config.timing.passive_min_ms..=config.timing.passive_max_ms),
            },
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Current health as a fraction of max
    pub fn health_ratio(&self) -> f32 {
        self.health / self.max_health
    }

    /// Health percent as the advisor sees it
    pub fn health_percent(&self) -> u8 {
        (self.health_ratio() * 100.0).clamp(0.0, 100.0) as u8
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply incoming damage; returns how much actually landed
    ///
    /// An active shield absorbs everything. Health never drops below zero.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        // NaN and infinities never land
        if self.shield.active || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        before - self.health
    }

    /// Restore health, capped at max; returns the amount restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    /// Force health to an exact value (clamped), for scripted scenarios
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn set_dialogue(&mut self, text: &str, now: Millis, duration_ms: Millis) {
        self.dialogue = Some(Dialogue {
            text: text.to_string(),
            expires_at: now + duration_ms,
        });
    }

    /// Dialogue still on screen at `now`
    pub fn active_dialogue(&self, now: Millis) -> Option<&str> {
        self.dialogue
            .as_ref()
            .filter(|d| d.expires_at > now)
            .map(|d| d.text.as_str())
    }

    /// Insert ahead of everything already queued
    pub fn prepend_action(&mut self, action: BossAction) {
        self.queue.push_front(action);
    }
}
