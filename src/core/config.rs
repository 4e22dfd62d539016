//! Encounter configuration with documented constants
//!
//! Every tunable of the boss encounter lives here. Profiles under
//! `data/encounters/` override individual sections; anything a profile
//! leaves out keeps the default below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::error::{GameError, Result};
use crate::core::types::Millis;

/// Playfield dimensions and the desperation squeeze
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Screen width in pixels
    pub width: f32,
    /// Screen height in pixels
    pub height: f32,
    /// Pixels each side of the playable strip closes per tick in desperation mode
    pub shrink_per_tick: f32,
    /// Half-width of the strip once fully squeezed, around the screen center
    pub min_half_width: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            shrink_per_tick: 0.5,
            min_half_width: 50.0,
        }
    }
}

/// Boss body and health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub max_health: f32,
    /// Body size in pixels
    pub width: f32,
    pub height: f32,
    /// Y of the top edge at spawn; the boss starts horizontally centered
    pub spawn_top: f32,
    /// Drift speed in pixels per tick
    pub drift_speed: f32,
    /// Lateral jump distance of a DODGE
    pub dodge_distance: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            max_health: 2500.0,
            width: 160.0,
            height: 80.0,
            spawn_top: 50.0,
            drift_speed: 3.0,
            dodge_distance: 90.0,
        }
    }
}

/// Timers driving the tick loop and the sequencer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed simulation step
    pub tick_ms: Millis,
    /// Minimum gap between two queued actions
    pub action_cooldown_ms: Millis,
    /// How often the drift direction is re-rolled
    pub drift_reroll_ms: Millis,
    /// Periodic minion summon interval
    pub summon_interval_ms: Millis,
    /// Passive attack interval is rolled uniformly in this range after each shot
    pub passive_min_ms: Millis,
    pub passive_max_ms: Millis,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            action_cooldown_ms: 250,
            drift_reroll_ms: 2000,
            summon_interval_ms: 30_000,
            passive_min_ms: 1500,
            passive_max_ms: 2500,
        }
    }
}

/// Shield cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Health-ratio breakpoints, strictly descending, each consumed once
    pub thresholds: Vec<f32>,
    pub duration_ms: Millis,
    /// Fraction of max health restored when the shield drops
    pub heal_fraction: f32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.75, 0.50, 0.25],
            duration_ms: 4000,
            heal_fraction: 0.05,
        }
    }
}

/// One-shot escalation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Health ratio below which the boss enrages
    pub enrage_ratio: f32,
    /// Health ratio below which the final stand begins
    pub final_stand_ratio: f32,
    /// Minion waves summoned on the final-stand tick
    pub final_stand_summons: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            enrage_ratio: 0.50,
            final_stand_ratio: 0.10,
            final_stand_summons: 2,
        }
    }
}

/// Advisory request gating and response validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// When false the boss never consults the advisor and runs on fallback
    pub enabled: bool,
    /// Minimum time between two issued requests
    pub cooldown_ms: Millis,
    /// Wall-clock budget for one request before fallback is published
    pub timeout_ms: u64,
    /// A response needs at least this many recognized actions...
    pub min_recognized: usize,
    /// ...of which at least this many are attacks
    pub min_attacks: usize,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_ms: 10_000,
            timeout_ms: 8_000,
            min_recognized: 2,
            min_attacks: 1,
        }
    }
}

/// Minion summon limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinionConfig {
    /// Summons are refused while the hostile population is above this
    pub population_cap: usize,
    pub min_per_summon: u32,
    pub max_per_summon: u32,
}

impl Default for MinionConfig {
    fn default() -> Self {
        Self {
            population_cap: 30,
            min_per_summon: 8,
            max_per_summon: 12,
        }
    }
}

/// Waves fought before the boss arrives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub count: u32,
    /// Pause between a cleared wave and the next one (or the boss)
    pub cooldown_ms: Millis,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            count: 3,
            cooldown_ms: 3000,
        }
    }
}

/// Complete encounter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Profile name (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub boss: BossConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub shield: ShieldConfig,
    #[serde(default)]
    pub phases: PhaseConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub minions: MinionConfig,
    #[serde(default)]
    pub waves: WaveConfig,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            arena: ArenaConfig::default(),
            boss: BossConfig::default(),
            timing: TimingConfig::default(),
            shield: ShieldConfig::default(),
            phases: PhaseConfig::default(),
            advisory: AdvisoryConfig::default(),
            minions: MinionConfig::default(),
            waves: WaveConfig::default(),
        }
    }
}

impl EncounterConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.boss.max_health <= 0.0 {
            return Err(GameError::ConfigError("max_health must be positive".into()));
        }

        if self.timing.tick_ms == 0 {
            return Err(GameError::ConfigError("tick_ms must be positive".into()));
        }

        if self.timing.passive_min_ms > self.timing.passive_max_ms {
            return Err(GameError::ConfigError(format!(
                "passive_min_ms ({}) should be <= passive_max_ms ({})",
                self.timing.passive_min_ms, self.timing.passive_max_ms
            )));
        }

        // Thresholds are consumed head-first, so they must be strictly descending
        let thresholds = &self.shield.thresholds;
        if thresholds.iter().any(|t| *t <= 0.0 || *t >= 1.0) {
            return Err(GameError::ConfigError(
                "shield thresholds must lie strictly between 0 and 1".into(),
            ));
        }
        if thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(GameError::ConfigError(format!(
                "shield thresholds must be strictly descending: {:?}",
                thresholds
            )));
        }

        if self.phases.final_stand_ratio >= self.phases.enrage_ratio {
            return Err(GameError::ConfigError(format!(
                "final_stand_ratio ({}) should be < enrage_ratio ({})",
                self.phases.final_stand_ratio, self.phases.enrage_ratio
            )));
        }

        if self.minions.min_per_summon > self.minions.max_per_summon {
            return Err(GameError::ConfigError(
                "min_per_summon should be <= max_per_summon".into(),
            ));
        }

        if self.advisory.min_attacks > self.advisory.min_recognized {
            return Err(GameError::ConfigError(
                "min_attacks cannot exceed min_recognized".into(),
            ));
        }

        if self.arena.min_half_width * 2.0 >= self.arena.width {
            return Err(GameError::ConfigError(
                "min_half_width leaves no room to shrink".into(),
            ));
        }

        Ok(())
    }
}

/// Load an encounter profile from TOML
///
/// Loads from `data/encounters/{name}.toml` and validates it.
pub fn load_config(name: &str) -> Result<EncounterConfig> {
    let path = config_path(name);

    let contents = fs::read_to_string(&path).map_err(|e| {
        GameError::ConfigError(format!("Failed to read profile {:?}: {}", path, e))
    })?;

    let mut config: EncounterConfig = toml::from_str(&contents)?;
    config.name = name.to_string();
    config.validate()?;
    Ok(config)
}

/// Get path to an encounter profile
fn config_path(name: &str) -> PathBuf {
    PathBuf::from("data/encounters").join(format!("{}.toml", name))
}
