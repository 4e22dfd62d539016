//! Pixel Vengeance - headless encounter runner
//!
//! Plays the warm-up waves and the boss fight against a scripted player
//! that deals a fixed damage rate, then prints a summary. With an LLM
//! configured (LLM_API_URL / LLM_API_KEY / LLM_MODEL) the boss consults it
//! for attack sequences; `--offline` keeps the run fully deterministic.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use pixel_vengeance::arena::{WaveDirector, WaveEvent};
use pixel_vengeance::boss::{AdvisoryAdapter, Encounter, EncounterOutcome, PhaseEvent};
use pixel_vengeance::core::config::{load_config, EncounterConfig};
use pixel_vengeance::core::error::Result;
use pixel_vengeance::core::types::{Millis, Vec2};
use pixel_vengeance::llm::client::LlmClient;

/// Headless boss encounter runner
#[derive(Parser, Debug)]
#[command(name = "pixel-vengeance")]
#[command(about = "Run the wave gauntlet and boss fight headless and report what happened")]
struct Args {
    /// Encounter profile (loaded from data/encounters/)
    #[arg(long, default_value = "default")]
    profile: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation time limit in milliseconds
    #[arg(long, default_value_t = 300_000)]
    max_ms: Millis,

    /// Damage per second the scripted player lands on the boss
    #[arg(long, default_value_t = 60.0)]
    dps: f32,

    /// Start with the boss instead of the warm-up waves
    #[arg(long)]
    skip_waves: bool,

    /// Never call the advisor; fallback sequence only
    #[arg(long)]
    offline: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// Run summary
#[derive(Serialize, Default)]
struct RunSummary {
    profile: String,
    seed: u64,
    outcome: String,
    elapsed_ms: Millis,
    waves_cleared: u32,
    boss_arrived_at: Option<Millis>,
    boss_health: f32,
    shields_raised: usize,
    enraged_at: Option<Millis>,
    final_stand_at: Option<Millis>,
    minions_summoned: usize,
    summons_refused: usize,
    advisory_requests: usize,
    actions: BTreeMap<String, usize>,
    spawns: BTreeMap<String, usize>,
    final_arena_width: f32,
}

/// Enemies on the field, each with the time the player finishes it off
struct Field {
    deaths: Vec<Millis>,
}

impl Field {
    fn add<R: Rng + ?Sized>(&mut self, count: usize, now: Millis, rng: &mut R) {
        self.deaths
            .extend((0..count).map(|_| now + rng.gen_range(1_500..=4_000)));
    }

    fn update(&mut self, now: Millis) -> usize {
        self.deaths.retain(|&death| death > now);
        self.deaths.len()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pixel_vengeance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = load_config(&args.profile).unwrap_or_else(|e| {
        tracing::warn!("Failed to load profile '{}': {}, using defaults", args.profile, e);
        EncounterConfig::default()
    });

    // Runtime for advisory requests; the tick loop itself stays synchronous
    let rt = Runtime::new()?;
    let adapter = build_adapter(&args, &config, &rt);
    let realtime = adapter.is_enabled();

    let summary = run(&args, config, adapter, seed, realtime)?;

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            tracing::warn!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn build_adapter(args: &Args, config: &EncounterConfig, rt: &Runtime) -> AdvisoryAdapter {
    if args.offline || !config.advisory.enabled {
        return AdvisoryAdapter::disabled();
    }

    match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!("Advisor: {:?} model {}", client.api_format(), client.model());
            AdvisoryAdapter::new(Arc::new(client), rt.handle().clone(), config.advisory.clone())
        }
        Err(e) => {
            tracing::warn!("No advisor available ({}), running on fallback", e);
            AdvisoryAdapter::disabled()
        }
    }
}

fn run(
    args: &Args,
    config: EncounterConfig,
    adapter: AdvisoryAdapter,
    seed: u64,
    realtime: bool,
) -> Result<RunSummary> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tick_ms = config.timing.tick_ms;
    let damage_per_tick = args.dps * tick_ms as f32 / 1000.0;
    let player = Vec2::new(config.arena.width / 2.0, config.arena.height - 40.0);

    let mut summary = RunSummary {
        profile: config.name.clone(),
        seed,
        outcome: "timeout".into(),
        final_arena_width: config.arena.width,
        ..RunSummary::default()
    };

    let mut field = Field { deaths: Vec::new() };
    let mut waves = WaveDirector::new(&config.waves, 0);
    let mut encounter: Option<Encounter> = None;
    let mut pending_adapter = Some(adapter);
    let mut pending_config = Some(config);

    let mut now: Millis = 0;
    while now <= args.max_ms {
        let hostiles = field.update(now);

        if encounter.is_none() {
            let boss_ready = args.skip_waves || {
                let tick = waves.tick(now, hostiles, &mut rng);
                field.add(tick.spawn as usize, now, &mut rng);
                for event in &tick.events {
                    if let WaveEvent::WaveCleared { .. } = event {
                        summary.waves_cleared += 1;
                    }
                }
                waves.boss_ready()
            };

            if boss_ready {
                if let (Some(config), Some(adapter)) = (pending_config.take(), pending_adapter.take()) {
                    summary.boss_arrived_at = Some(now);
                    encounter = Some(Encounter::begin(config, adapter, seed, now)?);
                }
            }
        }

        if let Some(fight) = encounter.as_mut() {
            fight.apply_damage(damage_per_tick);
            let report = fight.tick(now, player, hostiles);

            for spawn in &report.spawns {
                *summary.spawns.entry(format!("{:?}", spawn.kind())).or_default() += 1;
            }
            for event in &report.events {
                match event {
                    PhaseEvent::ShieldRaised { .. } => summary.shields_raised += 1,
                    PhaseEvent::Enraged => summary.enraged_at = Some(now),
                    PhaseEvent::FinalStand => summary.final_stand_at = Some(now),
                    PhaseEvent::MinionsSummoned { count } => {
                        summary.minions_summoned += count;
                        field.add(*count, now, &mut rng);
                    }
                    PhaseEvent::SummonRefused => summary.summons_refused += 1,
                    PhaseEvent::AdvisoryRequested => summary.advisory_requests += 1,
                    PhaseEvent::ActionPerformed { action } => {
                        *summary.actions.entry(action.to_string()).or_default() += 1
                    }
                    PhaseEvent::ShieldDropped { .. } => {}
                }
            }

            summary.boss_health = report.health;
            summary.final_arena_width = report.arena.width();

            if report.outcome == EncounterOutcome::BossDefeated {
                summary.outcome = "boss_defeated".into();
                break;
            }
        }

        if realtime {
            std::thread::sleep(Duration::from_millis(tick_ms));
        }
        now += tick_ms;
    }

    summary.elapsed_ms = now.min(args.max_ms);
    Ok(summary)
}

fn print_text(summary: &RunSummary) {
    println!("Encounter Result");
    println!("================");
    println!("Outcome: {}", summary.outcome);
    println!("Elapsed: {:.1}s", summary.elapsed_ms as f32 / 1000.0);
    println!("Waves cleared: {}", summary.waves_cleared);
    if let Some(at) = summary.boss_arrived_at {
        println!("Boss arrived: {:.1}s", at as f32 / 1000.0);
    }
    println!("Boss health: {:.0}", summary.boss_health);
    println!("Shields raised: {}", summary.shields_raised);
    if let Some(at) = summary.enraged_at {
        println!("Enraged: {:.1}s", at as f32 / 1000.0);
    }
    if let Some(at) = summary.final_stand_at {
        println!("Final stand: {:.1}s", at as f32 / 1000.0);
    }
    println!(
        "Minions summoned: {} ({} summons refused)",
        summary.minions_summoned, summary.summons_refused
    );
    println!("Advisory requests: {}", summary.advisory_requests);
    println!("Final arena width: {:.1}", summary.final_arena_width);
    println!();
    println!("Actions:");
    for (action, count) in &summary.actions {
        println!("  {:<16} {}", action, count);
    }
    println!("Spawns:");
    for (kind, count) in &summary.spawns {
        println!("  {:<16} {}", kind, count);
    }
    println!();
    println!("Profile: {}", summary.profile);
    println!("Seed: {}", summary.seed);
}
