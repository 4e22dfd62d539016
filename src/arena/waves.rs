//! Warm-up waves fought before the boss shows up

use rand::Rng;
use serde::Serialize;

use crate::core::config::WaveConfig;
use crate::core::types::Millis;

const BASE_ENEMIES: u32 = 10;
const ENEMIES_PER_WAVE: u32 = 5;
const BASE_SPAWN_INTERVAL_MS: Millis = 500;
const SPAWN_INTERVAL_STEP_MS: Millis = 80;
const MIN_SPAWN_INTERVAL_MS: Millis = 100;

/// Enemy count for wave `n` (1-based)
pub fn wave_size(wave: u32) -> u32 {
    BASE_ENEMIES + wave * ENEMIES_PER_WAVE
}

/// Time between spawn batches for wave `n`
pub fn spawn_interval(wave: u32) -> Millis {
    BASE_SPAWN_INTERVAL_MS
        .saturating_sub(wave as Millis * SPAWN_INTERVAL_STEP_MS)
        .max(MIN_SPAWN_INTERVAL_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum WaveStage {
    /// Waiting out the pause after a clear (or before the first wave)
    Cooldown { since: Millis },
    Active {
        to_spawn: u32,
        spawned: u32,
        last_spawn_at: Option<Millis>,
    },
    BossArrived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WaveEvent {
    WaveStarted { wave: u32, enemies: u32, interval_ms: Millis },
    WaveCleared { wave: u32 },
    BossArrives,
}

/// What the director wants from the spawning system this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveTick {
    /// Basic enemies to create now
    pub spawn: u32,
    pub events: Vec<WaveEvent>,
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    config: WaveConfig,
    current_wave: u32,
    stage: WaveStage,
}

impl WaveDirector {
    /// First wave follows one cooldown after `now`
    pub fn new(config: &WaveConfig, now: Millis) -> Self {
        Self {
            config: config.clone(),
            current_wave: 0,
            stage: WaveStage::Cooldown { since: now },
        }
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn stage(&self) -> WaveStage {
        self.stage
    }

    pub fn boss_ready(&self) -> bool {
        self.stage == WaveStage::BossArrived
    }

    /// Advance the wave schedule
    ///
    /// `hostiles_alive` is the number of wave enemies still on the field.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Millis, hostiles_alive: usize, rng: &mut R) -> WaveTick {
        let mut tick = WaveTick::default();

        match self.stage {
            WaveStage::Cooldown { since } => {
                if now.saturating_sub(since) >= self.config.cooldown_ms {
                    self.advance(&mut tick);
                }
            }
            WaveStage::Active {
                to_spawn,
                spawned,
                last_spawn_at,
            } => {
                let interval = spawn_interval(self.current_wave);
                let due = last_spawn_at.map_or(true, |last| now.saturating_sub(last) >= interval);

                if spawned < to_spawn && due {
                    let batch = rng.gen_range(1..=2).min(to_spawn - spawned);
                    tick.spawn = batch;
                    self.stage = WaveStage::Active {
                        to_spawn,
                        spawned: spawned + batch,
                        last_spawn_at: Some(now),
                    };
                } else if spawned >= to_spawn && hostiles_alive == 0 {
                    tracing::info!("Wave {} clear", self.current_wave);
                    tick.events.push(WaveEvent::WaveCleared {
                        wave: self.current_wave,
                    });
                    self.stage = WaveStage::Cooldown { since: now };
                }
            }
            WaveStage::BossArrived => {}
        }

        tick
    }

    fn advance(&mut self, tick: &mut WaveTick) {
        if self.current_wave < self.config.count {
            self.current_wave += 1;
            let enemies = wave_size(self.current_wave);
            let interval_ms = spawn_interval(self.current_wave);
            tracing::info!(
                "Wave {} incoming ({} enemies, every {}ms)",
                self.current_wave,
                enemies,
                interval_ms
            );
            tick.events.push(WaveEvent::WaveStarted {
                wave: self.current_wave,
                enemies,
                interval_ms,
            });
            self.stage = WaveStage::Active {
                to_spawn: enemies,
                spawned: 0,
                last_spawn_at: None,
            };
        } else {
            tracing::info!("Boss incoming");
            tick.events.push(WaveEvent::BossArrives);
            self.stage = WaveStage::BossArrived;
        }
    }
}
